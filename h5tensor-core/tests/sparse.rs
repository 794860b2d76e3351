use h5tensor_core::{
    mem::{MemDataset, MemGroup},
    Device, ElementType, Materializer,
};

fn coo_group() -> MemGroup {
    MemGroup::new("hist")
        .with_dataset(
            "indices",
            MemDataset::new("indices", [3, 2], vec![0i64, 1, 4, 4, 9, 0]),
        )
        .with_dataset("values", MemDataset::new("values", [3], vec![1.5f64, -2., 3.25]))
        .with_attr("dense_shape", &[10, 10])
}

macro_rules! test_for_device_sparse {
    ($dev:expr, $name:ident) => {
        mod $name {
            use super::*;

            fn materializer() -> Materializer {
                Materializer::new().on($dev)
            }

            #[test]
            fn parts_are_kept_verbatim() {
                let group = coo_group();
                let sparse = materializer().make_sparse(&group).unwrap();
                assert_eq!(sparse.indices().dims(), &[3, 2]);
                assert_eq!(sparse.indices().dtype(), ElementType::I64);
                assert_eq!(
                    sparse.indices().to_vec::<i64>().unwrap(),
                    vec![0, 1, 4, 4, 9, 0]
                );
                assert_eq!(sparse.values().dims(), &[3]);
                assert_eq!(
                    sparse.values().to_vec::<f64>().unwrap(),
                    vec![1.5, -2., 3.25]
                );
                assert_eq!(sparse.dense_shape().dims(), &[10, 10]);
                assert_eq!(sparse.nnz(), 3);
                assert_eq!(sparse.rank(), 2);
                assert_eq!(group.reads(), 2);
            }

            #[test]
            fn row_count_matches_value_count() {
                let sparse = materializer().make_sparse(&coo_group()).unwrap();
                assert_eq!(sparse.indices().dims()[0], sparse.values().dims()[0]);
            }

            #[test]
            fn empty_sparse_tensor() {
                let group = MemGroup::new("empty")
                    .with_dataset("indices", MemDataset::new("indices", [0, 3], Vec::<i64>::new()))
                    .with_dataset("values", MemDataset::new("values", [0], Vec::<f32>::new()))
                    .with_attr("dense_shape", &[4, 5, 6]);
                let sparse = materializer().make_sparse(&group).unwrap();
                assert_eq!(sparse.nnz(), 0);
                assert_eq!(sparse.indices().dims(), &[0, 3]);
                assert_eq!(group.reads(), 0);
            }

            #[test]
            fn flattened_indices_are_reshaped() {
                let group = MemGroup::new("flat")
                    .with_dataset(
                        "indices",
                        MemDataset::new("indices", [4], vec![0i32, 0, 1, 1])
                            .with_attr("original_shape", &[2, 2]),
                    )
                    .with_dataset("values", MemDataset::new("values", [2], vec![1f32, 2.]))
                    .with_attr("dense_shape", &[2, 2]);
                let sparse = materializer().make_sparse(&group).unwrap();
                assert_eq!(sparse.indices().dims(), &[2, 2]);
            }
        }
    };
}

test_for_device_sparse!(Device::Cpu, cpu_tests_sparse);
#[cfg(feature = "cuda")]
test_for_device_sparse!(Device::new_cuda(0).unwrap(), cuda_tests_sparse);

fn cpu() -> Materializer {
    Materializer::new().on(Device::Cpu)
}

#[test]
fn missing_values_reads_nothing() {
    let group = MemGroup::new("hist")
        .with_dataset("indices", MemDataset::new("indices", [3, 2], vec![0i64; 6]))
        .with_attr("dense_shape", &[10, 10]);
    let err = cpu().make_sparse(&group).unwrap_err();
    assert!(err.is_missing_field(), "{err}");
    assert!(err.to_string().contains("values"));
    assert_eq!(group.reads(), 0);
}

#[test]
fn missing_indices() {
    let group = MemGroup::new("hist")
        .with_dataset("values", MemDataset::new("values", [3], vec![1f64; 3]))
        .with_attr("dense_shape", &[10, 10]);
    let err = cpu().make_sparse(&group).unwrap_err();
    assert!(err.is_missing_field(), "{err}");
    assert_eq!(group.reads(), 0);
}

#[test]
fn missing_dense_shape() {
    let group = MemGroup::new("hist")
        .with_dataset("indices", MemDataset::new("indices", [3, 2], vec![0i64; 6]))
        .with_dataset("values", MemDataset::new("values", [3], vec![1f64; 3]));
    let err = cpu().make_sparse(&group).unwrap_err();
    assert!(err.is_missing_field(), "{err}");
    assert!(err.to_string().contains("dense_shape"));
    assert_eq!(group.reads(), 0);
}

#[test]
fn row_count_mismatch_is_inconsistent() {
    let group = MemGroup::new("hist")
        .with_dataset("indices", MemDataset::new("indices", [3, 2], vec![0i64; 6]))
        .with_dataset("values", MemDataset::new("values", [2], vec![1f64; 2]))
        .with_attr("dense_shape", &[10, 10]);
    let err = cpu().make_sparse(&group).unwrap_err();
    assert!(err.is_inconsistent(), "{err}");
}

#[test]
fn unchecked_assembly_keeps_mismatched_parts() {
    let group = MemGroup::new("hist")
        .with_dataset("indices", MemDataset::new("indices", [3, 2], vec![0i64; 6]))
        .with_dataset("values", MemDataset::new("values", [2], vec![1f64; 2]))
        .with_attr("dense_shape", &[10, 10]);
    let sparse = cpu().validate_sparse(false).make_sparse(&group).unwrap();
    assert_eq!(sparse.indices().dims(), &[3, 2]);
    assert_eq!(sparse.values().dims(), &[2]);
}

#[test]
fn rank_mismatch_is_inconsistent() {
    let group = coo_group().with_attr("dense_shape", &[10, 10, 10]);
    let err = cpu().make_sparse(&group).unwrap_err();
    assert!(err.is_inconsistent(), "{err}");
}

#[test]
fn float_indices_are_inconsistent() {
    let group = coo_group().with_dataset(
        "indices",
        MemDataset::new("indices", [3, 2], vec![0f32; 6]),
    );
    let err = cpu().make_sparse(&group).unwrap_err();
    assert!(err.is_inconsistent(), "{err}");
}

#[test]
fn nested_read_failure_propagates() {
    let group = coo_group().with_dataset(
        "values",
        MemDataset::new("values", [3], vec![1f64; 3]).failing("truncated file"),
    );
    let err = cpu().make_sparse(&group).unwrap_err();
    assert!(err.is_read_failure(), "{err}");
}

#[test]
fn free_function_uses_default_device() {
    let sparse = h5tensor_core::make_sparse(&coo_group()).unwrap();
    assert_eq!(sparse.nnz(), 3);
    assert_eq!(sparse.dense_shape().dims(), &[10, 10]);
    assert!(sparse.values().device().same_device(&Device::best()));
}

#[test]
fn unchecked_scalar_values_count_one_element() {
    let group = coo_group().with_dataset(
        "values",
        MemDataset::new("values", Vec::<usize>::new(), vec![2.5f64]),
    );
    let sparse = cpu().validate_sparse(false).make_sparse(&group).unwrap();
    assert_eq!(sparse.values().rank(), 0);
    assert_eq!(sparse.nnz(), 1);
}

#[test]
fn overflowing_dense_shape_is_read_failure() {
    let group = coo_group().with_attr("dense_shape", &[i64::MAX, i64::MAX]);
    let err = cpu().make_sparse(&group).unwrap_err();
    assert!(err.is_read_failure(), "{err}");
    assert_eq!(group.reads(), 0);
}
