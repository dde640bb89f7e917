use std::collections::{HashMap, VecDeque};

use thiserror::Error;

use super::reformat::FlatRecord;

/// Malformed parent-pointer input. Any of these aborts the load; nothing
/// is partially rendered.
#[derive(Debug, Error)]
pub enum StructureError {
    #[error("no root record: every record names a parent")]
    MissingRoot,
    #[error("multiple root records: {0} and {1}")]
    MultipleRoots(String, String),
    #[error("duplicate record id {0}")]
    DuplicateId(String),
    #[error("record {id} references unknown parent {parent}")]
    UnknownParent { id: String, parent: String },
    #[error("cycle detected at record {0}")]
    Cycle(String),
}

#[derive(Clone, Debug)]
pub struct HierarchyNode {
    pub id: String,
    pub label: String,
    pub confidence: Option<f32>,
    pub depth: usize,
    pub parent: Option<usize>,
    pub children: Vec<usize>,
}

/// Single-rooted tree stored as an index arena. Children keep their
/// record emission order; `parent` is the non-owning back-reference used
/// for link rendering and ancestor walks.
#[derive(Clone, Debug)]
pub struct Hierarchy {
    nodes: Vec<HierarchyNode>,
    root: usize,
}

impl Hierarchy {
    pub fn from_records(records: &[FlatRecord]) -> Result<Self, StructureError> {
        let mut index_by_id = HashMap::with_capacity(records.len());
        for (index, record) in records.iter().enumerate() {
            if index_by_id.insert(record.id.as_str(), index).is_some() {
                return Err(StructureError::DuplicateId(record.id.clone()));
            }
        }

        let mut nodes = records
            .iter()
            .map(|record| HierarchyNode {
                id: record.id.clone(),
                label: record.label.clone(),
                confidence: record.confidence,
                depth: 0,
                parent: None,
                children: Vec::new(),
            })
            .collect::<Vec<_>>();

        let mut root = None;
        for (index, record) in records.iter().enumerate() {
            match &record.parent {
                None => match root {
                    None => root = Some(index),
                    Some(existing) => {
                        return Err(StructureError::MultipleRoots(
                            records[existing].id.clone(),
                            record.id.clone(),
                        ));
                    }
                },
                Some(parent_id) => {
                    let Some(&parent_index) = index_by_id.get(parent_id.as_str()) else {
                        return Err(StructureError::UnknownParent {
                            id: record.id.clone(),
                            parent: parent_id.clone(),
                        });
                    };
                    nodes[index].parent = Some(parent_index);
                    nodes[parent_index].children.push(index);
                }
            }
        }
        let root = root.ok_or(StructureError::MissingRoot)?;

        // Depth assignment doubles as reachability: a record whose parent
        // chain never reaches the root sits on a cycle.
        let mut depths = vec![None; nodes.len()];
        let mut queue = VecDeque::from([root]);
        depths[root] = Some(0usize);
        while let Some(index) = queue.pop_front() {
            let depth = depths[index].unwrap_or(0);
            for &child in &nodes[index].children {
                depths[child] = Some(depth + 1);
                queue.push_back(child);
            }
        }

        for (index, depth) in depths.iter().enumerate() {
            match depth {
                Some(depth) => nodes[index].depth = *depth,
                None => return Err(StructureError::Cycle(nodes[index].id.clone())),
            }
        }

        Ok(Self { nodes, root })
    }

    pub fn root(&self) -> usize {
        self.root
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, index: usize) -> &HierarchyNode {
        &self.nodes[index]
    }

    pub fn nodes(&self) -> &[HierarchyNode] {
        &self.nodes
    }

    pub fn max_depth(&self) -> usize {
        self.nodes.iter().map(|node| node.depth).max().unwrap_or(0)
    }

    /// Parent→child pairs, one per non-root node.
    pub fn links(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .filter_map(|(index, node)| node.parent.map(|parent| (parent, index)))
    }

    /// Pre-order walk from the root.
    pub fn descendants(&self) -> Vec<usize> {
        let mut order = Vec::with_capacity(self.nodes.len());
        let mut stack = vec![self.root];
        while let Some(index) = stack.pop() {
            order.push(index);
            for &child in self.nodes[index].children.iter().rev() {
                stack.push(child);
            }
        }
        order
    }

    /// Root-first path down to `index`, inclusive.
    pub fn ancestor_path(&self, index: usize) -> Vec<usize> {
        let mut path = vec![index];
        let mut cursor = index;
        while let Some(parent) = self.nodes[cursor].parent {
            path.push(parent);
            cursor = parent;
        }
        path.reverse();
        path
    }

    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.nodes.iter().position(|node| node.id == id)
    }

    /// Prunes the tree below `level`: nodes at exactly that depth lose
    /// their children, deeper nodes are discarded entirely.
    pub fn collapse_below(&mut self, level: usize) {
        let keep = self
            .descendants()
            .into_iter()
            .filter(|&index| self.nodes[index].depth <= level)
            .collect::<Vec<_>>();

        let mut remap = vec![usize::MAX; self.nodes.len()];
        for (new_index, &old_index) in keep.iter().enumerate() {
            remap[old_index] = new_index;
        }

        let mut nodes = Vec::with_capacity(keep.len());
        for &old_index in &keep {
            let node = &self.nodes[old_index];
            nodes.push(HierarchyNode {
                id: node.id.clone(),
                label: node.label.clone(),
                confidence: node.confidence,
                depth: node.depth,
                parent: node.parent.map(|parent| remap[parent]),
                children: if node.depth == level {
                    Vec::new()
                } else {
                    node.children.iter().map(|&child| remap[child]).collect()
                },
            });
        }

        self.root = remap[self.root];
        self.nodes = nodes;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, parent: Option<&str>) -> FlatRecord {
        FlatRecord {
            id: id.to_owned(),
            parent: parent.map(str::to_owned),
            label: id.to_owned(),
            confidence: Some(50.0),
        }
    }

    fn deep_chain(depth: usize) -> Vec<FlatRecord> {
        (0..depth)
            .map(|level| {
                let parent = (level > 0).then(|| (level - 1).to_string());
                FlatRecord {
                    id: level.to_string(),
                    parent,
                    label: level.to_string(),
                    confidence: None,
                }
            })
            .collect()
    }

    #[test]
    fn builds_depths_and_ordered_children() {
        let records = vec![
            record("r", None),
            record("a", Some("r")),
            record("b", Some("r")),
            record("a1", Some("a")),
        ];
        let hierarchy = Hierarchy::from_records(&records).expect("valid records");

        let root = hierarchy.root();
        assert_eq!(hierarchy.node(root).id, "r");
        assert_eq!(hierarchy.node(root).depth, 0);

        let children: Vec<_> = hierarchy.node(root)
            .children
            .iter()
            .map(|&child| hierarchy.node(child).id.as_str())
            .collect();
        assert_eq!(children, ["a", "b"]);

        let a1 = hierarchy.index_of("a1").expect("a1 exists");
        assert_eq!(hierarchy.node(a1).depth, 2);
        assert_eq!(hierarchy.links().count(), 3);
    }

    #[test]
    fn missing_root_is_rejected() {
        let records = vec![record("a", Some("b")), record("b", Some("a"))];
        assert!(matches!(
            Hierarchy::from_records(&records),
            Err(StructureError::MissingRoot)
        ));
    }

    #[test]
    fn multiple_roots_are_rejected() {
        let records = vec![record("a", None), record("b", None)];
        assert!(matches!(
            Hierarchy::from_records(&records),
            Err(StructureError::MultipleRoots(..))
        ));
    }

    #[test]
    fn dangling_parent_is_rejected() {
        let records = vec![record("a", None), record("b", Some("ghost"))];
        assert!(matches!(
            Hierarchy::from_records(&records),
            Err(StructureError::UnknownParent { .. })
        ));
    }

    #[test]
    fn duplicate_id_is_rejected() {
        let records = vec![record("a", None), record("a", Some("a"))];
        assert!(matches!(
            Hierarchy::from_records(&records),
            Err(StructureError::DuplicateId(..))
        ));
    }

    #[test]
    fn cycle_disconnected_from_root_is_rejected() {
        let records = vec![
            record("r", None),
            record("a", Some("b")),
            record("b", Some("a")),
        ];
        assert!(matches!(
            Hierarchy::from_records(&records),
            Err(StructureError::Cycle(..))
        ));
    }

    #[test]
    fn collapse_prunes_strictly_below_the_threshold() {
        let mut hierarchy = Hierarchy::from_records(&deep_chain(5)).expect("valid chain");
        hierarchy.collapse_below(2);

        assert_eq!(hierarchy.len(), 3);
        assert!(hierarchy.nodes().iter().all(|node| node.depth <= 2));
        for node in hierarchy.nodes() {
            if node.depth == 2 {
                assert!(node.children.is_empty());
            }
        }
    }

    #[test]
    fn collapse_at_zero_leaves_a_bare_root() {
        let mut hierarchy = Hierarchy::from_records(&deep_chain(3)).expect("valid chain");
        hierarchy.collapse_below(0);
        assert_eq!(hierarchy.len(), 1);
        assert!(hierarchy.node(hierarchy.root()).children.is_empty());
    }

    #[test]
    fn ancestor_path_runs_root_first() {
        let hierarchy = Hierarchy::from_records(&deep_chain(4)).expect("valid chain");
        let leaf = hierarchy.index_of("3").expect("leaf exists");
        let path: Vec<_> = hierarchy
            .ancestor_path(leaf)
            .into_iter()
            .map(|index| hierarchy.node(index).id.clone())
            .collect();
        assert_eq!(path, ["0", "1", "2", "3"]);
    }
}
