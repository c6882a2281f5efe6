//! I/O 支持：树描述文档与查询批次的 JSON、RON 序列化接口。
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use std::str::FromStr;

use ron::ser::PrettyConfig;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use thiserror::Error;

use crate::tree::adjacency::{Adjacency, InvalidTreeError};
use crate::tree::ids::NodeId;
use crate::tree::index::LcaError;

#[derive(Debug, Error)]
pub enum IoError {
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("ron error: {0}")]
    Ron(#[from] ron::Error),
    #[error("ron error: {0}")]
    RonSpanned(#[from] ron::error::SpannedError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid tree: {0}")]
    Tree(#[from] InvalidTreeError),
    #[error("document declares {declared} nodes but its tree describes {actual}")]
    NodeCount { declared: usize, actual: usize },
    #[error("unknown document format `{0}`, expected `json` or `ron`")]
    UnknownFormat(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentFormat {
    Json,
    Ron,
}

impl DocumentFormat {
    /// Guesses the format from the file extension.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Option<Self> {
        let extension = path.as_ref().extension()?.to_str()?;
        extension.parse().ok()
    }
}

impl FromStr for DocumentFormat {
    type Err = IoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(DocumentFormat::Json),
            "ron" => Ok(DocumentFormat::Ron),
            other => Err(IoError::UnknownFormat(other.to_string())),
        }
    }
}

/// The tree in one of the accepted adjacency shapes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TreeInput {
    Edges(Vec<(u32, u32)>),
    Lists(Vec<Vec<u32>>),
    Matrix(Vec<Vec<u8>>),
    Parents(Vec<Option<u32>>),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeDocument {
    pub nodes: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root: Option<u32>,
    pub tree: TreeInput,
}

impl TreeDocument {
    pub fn to_adjacency(&self) -> Result<Adjacency, IoError> {
        let declared = self.nodes;
        let check = |actual: usize| {
            if actual == declared {
                Ok(())
            } else {
                Err(IoError::NodeCount { declared, actual })
            }
        };

        let adjacency = match &self.tree {
            TreeInput::Edges(edges) => Adjacency::from_edges(declared, edges.iter().copied())?,
            TreeInput::Lists(lists) => {
                check(lists.len())?;
                Adjacency::from_lists(lists)?
            }
            TreeInput::Matrix(matrix) => {
                check(matrix.len())?;
                Adjacency::from_matrix::<u8, _>(matrix)?
            }
            TreeInput::Parents(parents) => {
                check(parents.len())?;
                Adjacency::from_parents(parents)?
            }
        };
        Ok(adjacency)
    }

    pub fn root(&self) -> Option<NodeId> {
        self.root.map(NodeId::new)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryBatch {
    pub pairs: Vec<(u32, u32)>,
}

impl QueryBatch {
    pub fn node_pairs(&self) -> Vec<(NodeId, NodeId)> {
        self.pairs
            .iter()
            .map(|&(u, v)| (NodeId::new(u), NodeId::new(v)))
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryAnswer {
    pub u: u32,
    pub v: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lca: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl QueryAnswer {
    pub fn new(u: NodeId, v: NodeId, result: &Result<NodeId, LcaError>) -> Self {
        let (lca, error) = match result {
            Ok(node) => (Some(node.raw()), None),
            Err(err) => (None, Some(err.to_string())),
        };
        Self {
            u: u.raw(),
            v: v.raw(),
            lca,
            error,
        }
    }
}

pub fn to_json_string<T>(value: &T) -> Result<String, IoError>
where
    T: Serialize,
{
    Ok(serde_json::to_string_pretty(value)?)
}

pub fn from_json_str<T>(s: &str) -> Result<T, IoError>
where
    T: DeserializeOwned,
{
    Ok(serde_json::from_str(s)?)
}

pub fn write_json<P: AsRef<Path>, T: Serialize>(path: P, value: &T) -> Result<(), IoError> {
    let mut file = File::create(path)?;
    let content = to_json_string(value)?;
    file.write_all(content.as_bytes())?;
    Ok(())
}

pub fn read_json<P: AsRef<Path>, T: DeserializeOwned>(path: P) -> Result<T, IoError> {
    from_json_str(&read_to_string(path)?)
}

pub fn to_ron_string<T>(value: &T) -> Result<String, IoError>
where
    T: Serialize,
{
    let mut pretty = PrettyConfig::default();
    pretty.new_line = "\n".into();
    Ok(ron::ser::to_string_pretty(value, pretty)?)
}

pub fn from_ron_str<T>(s: &str) -> Result<T, IoError>
where
    T: DeserializeOwned,
{
    Ok(ron::from_str(s)?)
}

pub fn write_ron<P: AsRef<Path>, T: Serialize>(path: P, value: &T) -> Result<(), IoError> {
    let mut file = File::create(path)?;
    let content = to_ron_string(value)?;
    file.write_all(content.as_bytes())?;
    Ok(())
}

pub fn read_ron<P: AsRef<Path>, T: DeserializeOwned>(path: P) -> Result<T, IoError> {
    from_ron_str(&read_to_string(path)?)
}

/// Reads `path` as `format`, falling back to the file extension and then JSON.
pub fn read_document<P, T>(path: P, format: Option<DocumentFormat>) -> Result<T, IoError>
where
    P: AsRef<Path>,
    T: DeserializeOwned,
{
    let format = format
        .or_else(|| DocumentFormat::from_path(&path))
        .unwrap_or(DocumentFormat::Json);
    match format {
        DocumentFormat::Json => read_json(path),
        DocumentFormat::Ron => read_ron(path),
    }
}

fn read_to_string<P: AsRef<Path>>(path: P) -> Result<String, IoError> {
    let mut file = File::open(path)?;
    let mut content = String::new();
    file.read_to_string(&mut content)?;
    Ok(content)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_document_with_edges() {
        let doc: TreeDocument = from_json_str(
            r#"{ "nodes": 4, "root": 1, "tree": { "edges": [[0, 1], [1, 2], [1, 3]] } }"#,
        )
        .unwrap();
        assert_eq!(doc.root(), Some(NodeId::new(1)));
        let adjacency = doc.to_adjacency().unwrap();
        assert_eq!(adjacency.edge_count(), 3);
        assert_eq!(adjacency.neighbors(NodeId::new(1)).len(), 3);
    }

    #[test]
    fn ron_document_survives_a_round_trip() {
        let doc = TreeDocument {
            nodes: 3,
            root: None,
            tree: TreeInput::Parents(vec![None, Some(0), Some(0)]),
        };
        let text = to_ron_string(&doc).unwrap();
        let back: TreeDocument = from_ron_str(&text).unwrap();
        assert_eq!(back, doc);
    }

    #[test]
    fn node_count_mismatch_is_reported() {
        let doc = TreeDocument {
            nodes: 3,
            root: None,
            tree: TreeInput::Matrix(vec![vec![0, 1], vec![1, 0]]),
        };
        assert!(matches!(
            doc.to_adjacency(),
            Err(IoError::NodeCount {
                declared: 3,
                actual: 2
            })
        ));
    }

    #[test]
    fn format_is_guessed_from_extension() {
        assert_eq!(
            DocumentFormat::from_path("trees/sample.RON"),
            Some(DocumentFormat::Ron)
        );
        assert_eq!(
            DocumentFormat::from_path("sample.json"),
            Some(DocumentFormat::Json)
        );
        assert_eq!(DocumentFormat::from_path("sample.txt"), None);
        assert!(matches!(
            "yaml".parse::<DocumentFormat>(),
            Err(IoError::UnknownFormat(_))
        ));
    }

    #[test]
    fn euler_tour_dumps_as_json() {
        let adjacency = Adjacency::from_edges(3, [(0, 1), (0, 2)]).unwrap();
        let tour = crate::tree::tour::EulerTour::build(&adjacency, NodeId::ROOT).unwrap();
        let value: serde_json::Value = from_json_str(&to_json_string(&tour).unwrap()).unwrap();
        assert_eq!(value["nodes"], serde_json::json!([0, 1, 0, 2, 0]));
        assert_eq!(value["depths"], serde_json::json!([0, 1, 0, 1, 0]));
        assert_eq!(value["first"], serde_json::json!([0, 1, 3]));
        assert_eq!(value["parent"], serde_json::json!([null, 0, 0]));
    }

    #[test]
    fn answers_carry_either_node_or_error() {
        let ok = QueryAnswer::new(NodeId::new(1), NodeId::new(2), &Ok(NodeId::new(0)));
        assert_eq!(ok.lca, Some(0));
        assert_eq!(
            to_json_string(&ok).unwrap(),
            "{\n  \"u\": 1,\n  \"v\": 2,\n  \"lca\": 0\n}"
        );

        let err = QueryAnswer::new(
            NodeId::new(9),
            NodeId::new(2),
            &Err(LcaError::UnknownNode(NodeId::new(9))),
        );
        assert_eq!(err.lca, None);
        assert_eq!(err.error.as_deref(), Some("unknown node NodeId(9)"));
    }
}
