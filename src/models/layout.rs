//! Ordering rules for attribute-set layouts and the category tree.

use crate::entities::{attribute_group, attribute_set_attribute, category};
use serde::Serialize;
use std::collections::HashMap;
use utoipa::ToSchema;

/// Sorts set memberships into display order: by group `sort_order` (group id breaks
/// ties), then membership `sort_order`, then attribute id. Ungrouped memberships
/// and memberships whose group is unknown come last.
pub fn display_order(
    groups: &[attribute_group::Model],
    mut memberships: Vec<attribute_set_attribute::Model>,
) -> Vec<attribute_set_attribute::Model> {
    let group_rank: HashMap<i32, (i32, i32)> = groups
        .iter()
        .map(|g| (g.id, (g.sort_order, g.id)))
        .collect();

    memberships.sort_by_key(|m| {
        let group_key = m
            .attribute_group_id
            .and_then(|id| group_rank.get(&id).copied());
        (
            group_key.is_none(),
            group_key.unwrap_or_default(),
            m.sort_order,
            m.attribute_id,
        )
    });
    memberships
}

/// Groups sorted by `sort_order`, then id.
pub fn sorted_groups(mut groups: Vec<attribute_group::Model>) -> Vec<attribute_group::Model> {
    groups.sort_by_key(|g| (g.sort_order, g.id));
    groups
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CategoryNode {
    #[serde(flatten)]
    pub category: category::Model,
    #[schema(no_recursion)]
    pub children: Vec<CategoryNode>,
}

/// Builds the category forest. Siblings are ordered by position then id;
/// categories whose parent is missing are treated as roots.
pub fn build_category_tree(categories: Vec<category::Model>) -> Vec<CategoryNode> {
    let known: std::collections::HashSet<i32> = categories.iter().map(|c| c.id).collect();
    let mut by_parent: HashMap<Option<i32>, Vec<category::Model>> = HashMap::new();
    for c in categories {
        let parent = c.parent_id.filter(|p| known.contains(p) && *p != c.id);
        by_parent.entry(parent).or_default().push(c);
    }
    attach_children(None, &mut by_parent)
}

fn attach_children(
    parent: Option<i32>,
    by_parent: &mut HashMap<Option<i32>, Vec<category::Model>>,
) -> Vec<CategoryNode> {
    let mut level = by_parent.remove(&parent).unwrap_or_default();
    level.sort_by_key(|c| (c.position, c.id));
    level
        .into_iter()
        .map(|category| {
            let children = attach_children(Some(category.id), by_parent);
            CategoryNode { category, children }
        })
        .collect()
}

/// True when making `new_parent` the parent of `category_id` would put the
/// category among its own ancestors. `parents` maps category id to parent id.
pub fn creates_cycle(
    parents: &HashMap<i32, Option<i32>>,
    category_id: i32,
    new_parent: Option<i32>,
) -> bool {
    let mut cursor = new_parent;
    let mut steps = 0usize;
    while let Some(id) = cursor {
        if id == category_id {
            return true;
        }
        steps += 1;
        if steps > parents.len() {
            // Existing data already loops.
            return true;
        }
        cursor = parents.get(&id).copied().flatten();
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn group(id: i32, sort_order: i32) -> attribute_group::Model {
        attribute_group::Model {
            id,
            attribute_set_id: 1,
            code: format!("g{}", id),
            label: format!("Group {}", id),
            sort_order,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn member(attribute_id: i32, group: Option<i32>, sort_order: i32) -> attribute_set_attribute::Model {
        attribute_set_attribute::Model {
            id: attribute_id * 10,
            attribute_set_id: 1,
            attribute_group_id: group,
            attribute_id,
            sort_order,
        }
    }

    fn cat(id: i32, parent_id: Option<i32>, position: i32) -> category::Model {
        category::Model {
            id,
            code: format!("c{}", id),
            parent_id,
            position,
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn orders_by_group_then_membership_then_attribute() {
        let groups = vec![group(1, 20), group(2, 10)];
        let ordered = display_order(
            &groups,
            vec![
                member(5, None, 0),
                member(4, Some(1), 1),
                member(3, Some(1), 0),
                member(2, Some(2), 5),
                member(1, Some(2), 5),
            ],
        );
        let ids: Vec<i32> = ordered.iter().map(|m| m.attribute_id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn equal_group_sort_orders_fall_back_to_group_id() {
        let groups = vec![group(7, 0), group(3, 0)];
        let ordered = display_order(&groups, vec![member(1, Some(7), 0), member(2, Some(3), 0)]);
        assert_eq!(ordered[0].attribute_id, 2);
    }

    #[test]
    fn unknown_group_sorts_with_ungrouped() {
        let ordered = display_order(&[group(1, 0)], vec![member(1, Some(99), 0), member(2, Some(1), 9)]);
        assert_eq!(ordered[0].attribute_id, 2);
    }

    #[test]
    fn builds_nested_tree_in_position_order() {
        let tree = build_category_tree(vec![
            cat(1, None, 1),
            cat(2, None, 0),
            cat(3, Some(1), 2),
            cat(4, Some(1), 1),
            cat(5, Some(4), 0),
        ]);
        assert_eq!(tree.len(), 2);
        assert_eq!(tree[0].category.id, 2);
        assert_eq!(tree[1].children[0].category.id, 4);
        assert_eq!(tree[1].children[0].children[0].category.id, 5);
        assert_eq!(tree[1].children[1].category.id, 3);
    }

    #[test]
    fn orphan_becomes_root() {
        let tree = build_category_tree(vec![cat(1, Some(42), 0)]);
        assert_eq!(tree.len(), 1);
    }

    #[test]
    fn detects_ancestor_cycles() {
        let parents: HashMap<i32, Option<i32>> =
            [(1, None), (2, Some(1)), (3, Some(2))].into_iter().collect();
        assert!(creates_cycle(&parents, 1, Some(3)));
        assert!(creates_cycle(&parents, 2, Some(2)));
        assert!(!creates_cycle(&parents, 3, Some(1)));
        assert!(!creates_cycle(&parents, 2, None));
    }
}
