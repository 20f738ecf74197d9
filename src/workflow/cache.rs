use super::interview::{Interview, InterviewId};

/// Ordered in-memory collection of interviews.
///
/// Order is insertion/retrieval order and is never re-sorted. Replacing an
/// existing interview keeps its position.
#[derive(Debug, Clone, Default)]
pub struct InterviewCache {
    entries: Vec<Interview>,
}

impl InterviewCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole collection, keeping the given order.
    /// Later duplicates of an id overwrite earlier ones in place.
    pub fn load(&mut self, interviews: impl IntoIterator<Item = Interview>) {
        self.entries.clear();
        for interview in interviews {
            self.upsert(interview);
        }
    }

    pub fn get(&self, id: &InterviewId) -> Option<&Interview> {
        self.entries.iter().find(|i| i.id() == id)
    }

    /// Insert at the end, or replace in place if the id is already cached.
    pub fn upsert(&mut self, interview: Interview) {
        match self.entries.iter_mut().find(|i| i.id() == interview.id()) {
            Some(slot) => *slot = interview,
            None => self.entries.push(interview),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Interview> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflow::Status;
    use crate::workflow::interview::tests::sample_interview;

    #[test]
    fn upsert_preserves_position() {
        let mut cache = InterviewCache::new();
        cache.upsert(sample_interview("a", "First", Status::Scheduled));
        cache.upsert(sample_interview("b", "Second", Status::Scheduled));
        cache.upsert(sample_interview("a", "First", Status::InProgress));

        let ids: Vec<_> = cache.iter().map(|i| i.id().as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
        assert_eq!(
            cache.get(&"a".into()).map(Interview::status),
            Some(Status::InProgress)
        );
    }

    #[test]
    fn load_replaces_contents() {
        let mut cache = InterviewCache::new();
        cache.upsert(sample_interview("old", "Old", Status::Scheduled));
        cache.load(vec![
            sample_interview("x", "X", Status::Scheduled),
            sample_interview("y", "Y", Status::Completed),
        ]);
        assert_eq!(cache.len(), 2);
        assert!(cache.get(&"old".into()).is_none());
    }

    #[test]
    fn missing_id_is_none() {
        let cache = InterviewCache::new();
        assert!(cache.is_empty());
        assert!(cache.get(&"nope".into()).is_none());
    }
}
