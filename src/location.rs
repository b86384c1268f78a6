//! Document locations
//!
//! A `Location` is the path from the document root to the element being
//! compiled, e.g. `apps[0].nodes[1].topic_subs[2].identifier`. Every error and
//! diagnostic carries one so users can find the offending element.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One step of a document path
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Segment {
    /// Object key
    Field(String),
    /// Element of a named array (`nodes[3]`)
    Element { list: String, index: usize },
}

/// Path to an element in the configuration document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    segments: Vec<Segment>,
}

impl Location {
    /// The document root
    pub fn root() -> Self {
        Self::default()
    }

    /// Location of a key below this one
    pub fn field(&self, name: &str) -> Self {
        let mut loc = self.clone();
        loc.segments.push(Segment::Field(name.to_string()));
        loc
    }

    /// Location of the `index`-th element of the array stored under `list`
    pub fn element(&self, list: &str, index: usize) -> Self {
        let mut loc = self.clone();
        loc.segments.push(Segment::Element {
            list: list.to_string(),
            index,
        });
        loc
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Index of the enclosing app, if any
    pub fn app_index(&self) -> Option<usize> {
        self.index_of("apps")
    }

    /// Index of the enclosing node, if any
    pub fn node_index(&self) -> Option<usize> {
        self.index_of("nodes")
    }

    /// Last key on the path, i.e. the field being read
    pub fn field_name(&self) -> Option<&str> {
        match self.segments.last() {
            Some(Segment::Field(name)) => Some(name),
            _ => None,
        }
    }

    fn index_of(&self, list_name: &str) -> Option<usize> {
        self.segments.iter().find_map(|s| match s {
            Segment::Element { list, index } if list == list_name => Some(*index),
            _ => None,
        })
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            return write!(f, "<root>");
        }
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                write!(f, ".")?;
            }
            match segment {
                Segment::Field(name) => write!(f, "{}", name)?,
                Segment::Element { list, index } => write!(f, "{}[{}]", list, index)?,
            }
        }
        Ok(())
    }
}
