//! Partition report inputs by topic label.

use std::collections::BTreeMap;

use reviewlens_core::{defaults, LabeledText};

use crate::artifact::ArtifactKey;

/// Reviews sharing one topic label, in input order.
#[derive(Debug, Clone, PartialEq)]
pub struct TopicGroup<'a> {
    /// 1-based position among retained topics.
    pub number: usize,
    pub label: i64,
    pub texts: Vec<&'a str>,
}

impl TopicGroup<'_> {
    pub fn key(&self) -> ArtifactKey {
        ArtifactKey::Topic {
            number: self.number,
            label: self.label.to_string(),
        }
    }
}

/// Group texts by topic, ascending by label.
///
/// Texts without a topic or with the outlier label `-1` are left out, and
/// retained groups are numbered from 1.
///
/// The outlier group never takes a number: with `-1` present, label `0` is
/// still `topic_1_0.txt`, not `topic_2_0.txt`, so artifacts numbered with
/// the outlier group counted are not picked up on resume.
pub fn group_by_topic(inputs: &[LabeledText]) -> Vec<TopicGroup<'_>> {
    let mut groups: BTreeMap<i64, Vec<&str>> = BTreeMap::new();
    for input in inputs {
        let Some(label) = input.topic.filter(|t| *t != defaults::OUTLIER_TOPIC) else {
            continue;
        };
        groups.entry(label).or_default().push(input.text.as_str());
    }

    groups
        .into_iter()
        .enumerate()
        .map(|(i, (label, texts))| TopicGroup {
            number: i + 1,
            label,
            texts,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_groups_sorted_and_numbered() {
        let inputs = vec![
            LabeledText::new("a", Some(3)),
            LabeledText::new("b", Some(0)),
            LabeledText::new("c", Some(3)),
            LabeledText::new("d", Some(-1)),
            LabeledText::new("e", None),
            LabeledText::new("f", Some(0)),
        ];

        let groups = group_by_topic(&inputs);

        assert_eq!(groups.len(), 2);
        assert_eq!((groups[0].number, groups[0].label), (1, 0));
        assert_eq!(groups[0].texts, vec!["b", "f"]);
        assert_eq!((groups[1].number, groups[1].label), (2, 3));
        assert_eq!(groups[1].texts, vec!["a", "c"]);
        assert_eq!(groups[1].key().file_name(), "topic_2_3.txt");
    }

    #[test]
    fn test_outlier_group_takes_no_number() {
        let inputs = vec![
            LabeledText::new("noise", Some(-1)),
            LabeledText::new("x", Some(0)),
            LabeledText::new("y", Some(1)),
        ];

        let names: Vec<String> = group_by_topic(&inputs)
            .iter()
            .map(|g| g.key().file_name())
            .collect();

        assert_eq!(names, vec!["topic_1_0.txt", "topic_2_1.txt"]);
    }

    #[test]
    fn test_only_unassigned_yields_nothing() {
        let inputs = vec![LabeledText::new("x", None), LabeledText::new("y", Some(-1))];
        assert!(group_by_topic(&inputs).is_empty());
    }

    #[test]
    fn test_negative_labels_other_than_outlier_kept() {
        let inputs = vec![LabeledText::new("x", Some(-2))];
        let groups = group_by_topic(&inputs);
        assert_eq!(groups[0].key().file_name(), "topic_1_-2.txt");
    }
}
