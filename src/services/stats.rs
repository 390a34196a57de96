// src/services/stats.rs

//! Aggregations over a selected task set.

use indexmap::IndexMap;

use crate::models::{CategoryCounts, RankEntry, Task};

/// Rank students by number of tasks, most first.
///
/// Students with equal counts keep the order in which their first task
/// appears in `tasks`, so the result is deterministic for a given storage
/// order.
pub fn rank_students(tasks: &[Task]) -> Vec<RankEntry> {
    let mut counts: IndexMap<&str, usize> = IndexMap::new();
    for task in tasks {
        *counts.entry(task.student.as_str()).or_insert(0) += 1;
    }

    let mut ranking: Vec<RankEntry> = counts
        .into_iter()
        .map(|(student, tasks)| RankEntry::new(student, tasks))
        .collect();
    // sort_by is stable
    ranking.sort_by(|a, b| b.tasks.cmp(&a.tasks));
    ranking
}

/// Count category occurrences across tasks.
///
/// A task contributes one to every category it carries. Categories that no
/// task carries are absent, never zero.
pub fn count_categories(tasks: &[Task]) -> CategoryCounts {
    let mut counts = CategoryCounts::new();
    for category in tasks.iter().flat_map(|t| &t.categories) {
        *counts.entry(category.clone()).or_insert(0) += 1;
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::OrgId;

    fn task(key: u64, student: &str, categories: &[&str]) -> Task {
        Task {
            key,
            year: 2012,
            org: OrgId(1),
            student: student.to_string(),
            title: format!("Task {key}"),
            categories: categories.iter().map(|c| c.to_string()).collect(),
        }
    }

    #[test]
    fn test_rank_by_count_descending() {
        let tasks = vec![
            task(1, "B", &[]),
            task(2, "A", &[]),
            task(3, "A", &[]),
            task(4, "C", &[]),
            task(5, "A", &[]),
            task(6, "C", &[]),
        ];

        let ranking = rank_students(&tasks);
        assert_eq!(
            ranking,
            vec![
                RankEntry::new("A", 3),
                RankEntry::new("C", 2),
                RankEntry::new("B", 1),
            ]
        );
    }

    #[test]
    fn test_rank_ties_keep_first_seen_order() {
        let tasks = vec![
            task(1, "Zed", &[]),
            task(2, "Amy", &[]),
            task(3, "Amy", &[]),
            task(4, "Zed", &[]),
            task(5, "Bob", &[]),
        ];

        let students: Vec<String> = rank_students(&tasks).into_iter().map(|r| r.student).collect();
        assert_eq!(students, vec!["Zed", "Amy", "Bob"]);
    }

    #[test]
    fn test_rank_total_equals_task_count() {
        let tasks: Vec<Task> = (0..17)
            .map(|k| task(k, ["A", "B", "C", "D"][(k % 4) as usize], &[]))
            .collect();

        let total: usize = rank_students(&tasks).iter().map(|r| r.tasks).sum();
        assert_eq!(total, tasks.len());
    }

    #[test]
    fn test_rank_empty() {
        assert!(rank_students(&[]).is_empty());
    }

    #[test]
    fn test_categories_count_every_tag() {
        let tasks = vec![
            task(1, "A", &["Code", "Documentation", "Outreach"]),
            task(2, "B", &["Code"]),
            task(3, "A", &[]),
        ];

        let counts = count_categories(&tasks);
        assert_eq!(counts.len(), 3);
        assert_eq!(counts["Code"], 2);
        assert_eq!(counts["Documentation"], 1);
        assert_eq!(counts["Outreach"], 1);
        assert!(!counts.contains_key("Research"));

        let total: usize = counts.values().sum();
        let expected: usize = tasks.iter().map(|t| t.categories.len()).sum();
        assert_eq!(total, expected);
    }

    #[test]
    fn test_categories_serialize_as_object() {
        let counts = count_categories(&[task(1, "A", &["Code", "Design"])]);
        let json = serde_json::to_string(&counts).unwrap();
        assert_eq!(json, r#"{"Code":1,"Design":1}"#);
    }
}
