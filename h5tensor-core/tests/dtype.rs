use h5tensor_core::{DType, DenseTensor, Device, ElementType, Shape, StorageType};

#[test]
fn storage_types_map_exactly() {
    let cases = [
        (StorageType::Int { bytes: 1 }, ElementType::I8),
        (StorageType::Int { bytes: 2 }, ElementType::I16),
        (StorageType::Int { bytes: 4 }, ElementType::I32),
        (StorageType::Int { bytes: 8 }, ElementType::I64),
        (StorageType::Uint { bytes: 1 }, ElementType::U8),
        (StorageType::Uint { bytes: 2 }, ElementType::U16),
        (StorageType::Uint { bytes: 4 }, ElementType::U32),
        (StorageType::Uint { bytes: 8 }, ElementType::U64),
        (StorageType::Float { bytes: 4 }, ElementType::F32),
        (StorageType::Float { bytes: 8 }, ElementType::F64),
    ];
    for (tag, expected) in cases {
        assert_eq!(ElementType::from_storage(&tag, "d").unwrap(), expected, "{tag}");
    }
}

#[test]
fn unmapped_storage_types_are_unsupported() {
    let cases = [
        StorageType::Bool,
        StorageType::String,
        StorageType::Int { bytes: 16 },
        StorageType::Float { bytes: 16 },
        StorageType::Other("compound".to_string()),
    ];
    for tag in cases {
        let err = ElementType::from_storage(&tag, "d").unwrap_err();
        assert!(err.is_unsupported_dtype(), "{tag}: {err}");
    }
}

#[cfg(not(feature = "half"))]
#[test]
fn half_floats_need_the_half_feature() {
    let err = ElementType::from_storage(&StorageType::Float { bytes: 2 }, "d").unwrap_err();
    assert!(err.is_unsupported_dtype());
}

#[test]
fn element_type_properties() {
    assert!(ElementType::I64.is_integral());
    assert!(!ElementType::F32.is_integral());
    assert_eq!(ElementType::F64.size_in_bytes(), 8);
    assert_eq!(ElementType::U16.to_string(), "u16");
    assert_eq!(<i32 as DType>::ELEMENT, ElementType::I32);
}

#[test]
fn zeros_of_runtime_dtype() {
    let t = DenseTensor::zeros(ElementType::I32, [2, 2], &Device::Cpu).unwrap();
    assert_eq!(t.dtype(), ElementType::I32);
    assert_eq!(t.to_vec::<i32>().unwrap(), vec![0; 4]);
    assert_eq!(t.to_f64_vec().unwrap(), vec![0.0; 4]);
}

#[test]
fn typed_view_requires_matching_dtype() {
    let t = DenseTensor::zeros(ElementType::F32, [3], &Device::Cpu).unwrap();
    assert!(t.as_tensor::<f32>().is_some());
    assert!(t.as_tensor::<f64>().is_none());
    assert!(t.to_vec::<f64>().is_err());
}

#[test]
fn shapes() {
    let s = Shape::from([2, 3, 4]);
    assert_eq!(s.rank(), 3);
    assert_eq!(s.element_count(), 24);
    assert_eq!(s.strides(), vec![12, 4, 1]);
    assert_eq!(s.to_string(), "2x3x4");
    assert_eq!(Shape::scalar().element_count(), 1);
    assert!(Shape::from([4, 0]).is_empty());
    assert!(Shape::from_attr(&[3, -1]).is_err());
    assert_eq!(Shape::from_attr(&[10, 10]).unwrap(), Shape::from([10, 10]));
}

#[test]
fn element_count_overflow() {
    assert_eq!(Shape::from([2, 3, 4]).checked_element_count(), Some(24));
    assert_eq!(Shape::from([usize::MAX, 2]).checked_element_count(), None);
    assert_eq!(Shape::from([usize::MAX, 0]).checked_element_count(), Some(0));
    assert!(Shape::from_attr(&[i64::MAX, i64::MAX]).is_err());
    assert!(Shape::from_attr(&[0, i64::MAX, i64::MAX]).is_ok());
}
