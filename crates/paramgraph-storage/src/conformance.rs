//! Backend-agnostic checks run against every [`GraphStore`] implementation.

use paramgraph_core::{
    DependencyKey, NodeId, NodePosition, OptionId, ParamOption, Parameter, ParameterId, Position,
};

use crate::error::StorageError;
use crate::traits::GraphStore;

/// Inserts a parameter with `options` options labelled `"<slug>-<n>"`.
pub(crate) fn seed_parameter(
    store: &mut impl GraphStore,
    slug: &str,
    options: u32,
) -> (ParameterId, Vec<OptionId>) {
    let id = ParameterId::generate();
    store
        .insert_parameter(&Parameter {
            id,
            slug: slug.to_string(),
            label: slug.to_uppercase(),
        })
        .unwrap();
    let ids = (0..options)
        .map(|position| {
            let option = ParamOption {
                id: OptionId::generate(),
                parameter_id: id,
                label: format!("{slug}-{position}"),
                position,
            };
            store.insert_option(&option).unwrap();
            option.id
        })
        .collect();
    (id, ids)
}

fn key(parent: ParameterId, option: OptionId, child: ParameterId) -> DependencyKey {
    DependencyKey {
        parent_parameter_id: parent,
        parent_option_id: option,
        child_parameter_id: child,
    }
}

pub(crate) fn parameters_with_sorted_options(store: &mut impl GraphStore) {
    let roof = ParameterId::generate();
    store
        .insert_parameter(&Parameter {
            id: roof,
            slug: "roof-type".into(),
            label: "Roof Type".into(),
        })
        .unwrap();
    // Inserted out of display order.
    for (label, position) in [("Hip", 2), ("Gable", 0), ("Flat", 1)] {
        store
            .insert_option(&ParamOption {
                id: OptionId::generate(),
                parameter_id: roof,
                label: label.into(),
                position,
            })
            .unwrap();
    }
    let (slope, _) = seed_parameter(store, "slope", 1);

    let params = store.list_parameters().unwrap();
    assert_eq!(params.len(), 2);
    assert_eq!(params[0].parameter.id, roof);
    assert_eq!(params[1].parameter.id, slope);
    let labels: Vec<&str> = params[0].options.iter().map(|o| o.label.as_str()).collect();
    assert_eq!(labels, ["Gable", "Flat", "Hip"]);
}

pub(crate) fn option_requires_parameter(store: &mut impl GraphStore) {
    let orphan = ParamOption {
        id: OptionId::generate(),
        parameter_id: ParameterId::generate(),
        label: "orphan".into(),
        position: 0,
    };
    let err = store.insert_option(&orphan).unwrap_err();
    assert!(matches!(err, StorageError::ParameterNotFound(id) if id == orphan.parameter_id));
    assert!(store.list_parameters().unwrap().is_empty());
}

pub(crate) fn dependency_lifecycle(store: &mut impl GraphStore) {
    let (roof, roof_options) = seed_parameter(store, "roof-type", 2);
    let (slope, _) = seed_parameter(store, "slope", 2);

    let k = key(roof, roof_options[0], slope);
    let created = store.create_dependency(k).unwrap();
    assert_eq!(created.key(), k);

    let listed = store.list_dependencies().unwrap();
    assert_eq!(listed, vec![created.clone()]);

    let err = store.create_dependency(k).unwrap_err();
    assert!(matches!(err, StorageError::DuplicateDependency(dup) if dup == k));

    store.delete_dependency(&k).unwrap();
    assert!(store.list_dependencies().unwrap().is_empty());

    let err = store.delete_dependency(&k).unwrap_err();
    assert!(matches!(err, StorageError::DependencyNotFound(_)));
}

pub(crate) fn dependency_validation(store: &mut impl GraphStore) {
    let (roof, roof_options) = seed_parameter(store, "roof-type", 1);
    let (slope, slope_options) = seed_parameter(store, "slope", 1);

    let err = store
        .create_dependency(key(roof, roof_options[0], roof))
        .unwrap_err();
    assert!(matches!(err, StorageError::IntegrityError { .. }));

    // Option owned by the child rather than the parent.
    let err = store
        .create_dependency(key(roof, slope_options[0], slope))
        .unwrap_err();
    assert!(matches!(err, StorageError::IntegrityError { .. }));

    let missing = OptionId::generate();
    let err = store
        .create_dependency(key(roof, missing, slope))
        .unwrap_err();
    assert!(matches!(err, StorageError::OptionNotFound(id) if id == missing));

    let ghost = ParameterId::generate();
    let err = store
        .create_dependency(key(roof, roof_options[0], ghost))
        .unwrap_err();
    assert!(matches!(err, StorageError::ParameterNotFound(id) if id == ghost));

    assert!(store.list_dependencies().unwrap().is_empty());
}

pub(crate) fn delete_dependency_leaves_siblings(store: &mut impl GraphStore) {
    let (roof, roof_options) = seed_parameter(store, "roof-type", 2);
    let (slope, _) = seed_parameter(store, "slope", 1);
    let (gutter, _) = seed_parameter(store, "gutter", 1);

    let a = key(roof, roof_options[0], slope);
    let b = key(roof, roof_options[1], slope);
    let c = key(roof, roof_options[0], gutter);
    for k in [a, b, c] {
        store.create_dependency(k).unwrap();
    }

    store.delete_dependency(&b).unwrap();
    let remaining: Vec<DependencyKey> = store
        .list_dependencies()
        .unwrap()
        .iter()
        .map(|d| d.key())
        .collect();
    assert_eq!(remaining, vec![a, c]);
}

pub(crate) fn node_position_upsert_keeps_order(store: &mut impl GraphStore) {
    let (roof, _) = seed_parameter(store, "roof-type", 1);
    let (slope, _) = seed_parameter(store, "slope", 1);

    let first = NodePosition::canonical(roof, Position::new(0.0, 0.0));
    let second = NodePosition::canonical(slope, Position::new(100.0, 0.0));
    store.upsert_node_position(&first).unwrap();
    store.upsert_node_position(&second).unwrap();

    let moved = NodePosition {
        x: 40.0,
        y: 25.0,
        ..first.clone()
    };
    store.upsert_node_position(&moved).unwrap();

    let listed = store.list_node_positions().unwrap();
    assert_eq!(listed, vec![moved.clone(), second]);
    assert_eq!(store.get_node_position(first.id).unwrap(), moved);

    let err = store
        .upsert_node_position(&NodePosition::canonical(
            ParameterId::generate(),
            Position::default(),
        ))
        .unwrap_err();
    assert!(matches!(err, StorageError::ParameterNotFound(_)));
}

pub(crate) fn visible_options_update_and_delete(store: &mut impl GraphStore) {
    let (roof, options) = seed_parameter(store, "roof-type", 4);
    let duplicate = NodePosition {
        id: NodeId::generate(),
        parameter_id: roof,
        x: 20.0,
        y: 20.0,
        visible_options: None,
    };
    store.upsert_node_position(&duplicate).unwrap();
    assert_eq!(
        store.get_node_position(duplicate.id).unwrap().visible_options,
        None
    );

    let subset = vec![options[3], options[1]];
    store.update_visible_options(duplicate.id, &subset).unwrap();
    assert_eq!(
        store.get_node_position(duplicate.id).unwrap().visible_options,
        Some(subset)
    );

    store.update_visible_options(duplicate.id, &[]).unwrap();
    assert_eq!(
        store.get_node_position(duplicate.id).unwrap().visible_options,
        Some(Vec::new())
    );

    store.delete_node_position(duplicate.id).unwrap();
    let err = store.get_node_position(duplicate.id).unwrap_err();
    assert!(matches!(err, StorageError::NodePositionNotFound(id) if id == duplicate.id));
    let err = store
        .update_visible_options(duplicate.id, &options)
        .unwrap_err();
    assert!(matches!(err, StorageError::NodePositionNotFound(_)));
    let err = store.delete_node_position(duplicate.id).unwrap_err();
    assert!(matches!(err, StorageError::NodePositionNotFound(_)));
}
