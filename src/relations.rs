use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Static topic-relationship table. Pure data: maps a topic to the small
/// set of related topics inference may fan out to. Declared one-directionally;
/// only the declared direction propagates.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TopicRelations {
    relations: HashMap<String, Vec<String>>,
}

impl TopicRelations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, topic: impl Into<String>, related: Vec<String>) {
        self.relations.insert(topic.into(), related);
    }

    pub fn related(&self, topic: &str) -> &[String] {
        self.relations
            .get(topic)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.relations.is_empty()
    }

    pub fn len(&self) -> usize {
        self.relations.len()
    }
}

impl<S, I> FromIterator<(S, I)> for TopicRelations
where
    S: Into<String>,
    I: IntoIterator<Item = S>,
{
    fn from_iter<T: IntoIterator<Item = (S, I)>>(iter: T) -> Self {
        Self {
            relations: iter
                .into_iter()
                .map(|(topic, related)| {
                    (
                        topic.into(),
                        related.into_iter().map(Into::into).collect(),
                    )
                })
                .collect(),
        }
    }
}
