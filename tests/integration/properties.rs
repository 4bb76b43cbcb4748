use std::collections::{HashMap, HashSet};

use fsindex::index::resolver::join_path;
use fsindex::{ApiError, NodeKind};
use proptest::prelude::*;

use crate::integration::support::seeded_index;

#[derive(Debug, Clone)]
enum Op {
    Mkdir { parent: usize, name: usize },
    Put { parent: usize, name: usize },
}

const NAMES: [&str; 4] = ["a", "b", "c.txt", "d.tar.gz"];

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (any::<usize>(), 0..NAMES.len()).prop_map(|(parent, name)| Op::Mkdir { parent, name }),
        (any::<usize>(), 0..NAMES.len()).prop_map(|(parent, name)| Op::Put { parent, name }),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn hierarchy_invariants_hold(ops in prop::collection::vec(op_strategy(), 1..24)) {
        let (_temp, index) = seeded_index();
        let mut directories = vec!["/".to_string()];

        for op in &ops {
            match op {
                Op::Mkdir { parent, name } => {
                    let parent = directories[parent % directories.len()].clone();
                    let before = index.store().all().unwrap().len();
                    match index.create_directory(&parent, NAMES[*name]) {
                        Ok(entry) => directories.push(entry.path),
                        Err(ApiError::PathAlreadyExists(_)) => {
                            prop_assert_eq!(index.store().all().unwrap().len(), before);
                        }
                        Err(e) => return Err(TestCaseError::fail(format!("mkdir failed: {}", e))),
                    }
                }
                Op::Put { parent, name } => {
                    let parent = directories[parent % directories.len()].clone();
                    let entry = index.create_file(&parent, NAMES[*name], b"data").unwrap();
                    prop_assert!(entry.name.starts_with(NAMES[*name].split('.').next().unwrap()));
                }
            }
        }

        let nodes = index.store().all().unwrap();
        let by_id: HashMap<u64, _> = nodes.iter().map(|n| (n.id, n)).collect();

        let paths: HashSet<&str> = nodes.iter().map(|n| n.full_path.as_str()).collect();
        prop_assert_eq!(paths.len(), nodes.len());
        prop_assert_eq!(nodes.iter().filter(|n| n.parent_id.is_none()).count(), 1);

        for node in &nodes {
            prop_assert_eq!(&index.stat(&node.full_path).unwrap(), node);

            if let Some(parent_id) = node.parent_id {
                let parent = by_id[&parent_id];
                prop_assert_eq!(parent.kind, NodeKind::Directory);
                prop_assert_eq!(join_path(&parent.full_path, &node.name), node.full_path.clone());
            }

            if node.kind == NodeKind::Directory {
                let listed: HashSet<String> = index
                    .list(&node.full_path, false)
                    .unwrap()
                    .into_iter()
                    .map(|e| e.path)
                    .collect();
                let expected: HashSet<String> = nodes
                    .iter()
                    .filter(|n| n.parent_id == Some(node.id))
                    .map(|n| n.full_path.clone())
                    .collect();
                prop_assert_eq!(listed, expected);
            }
        }

        prop_assert!(index.audit().unwrap().is_consistent());
    }
}
