use super::*;

#[test]
fn test_decode_numeric_expands_runs_in_order() {
    let v = decode_numeric("1.5,2x3,0.25").unwrap();
    assert_eq!(v, vec![1.5, 2.0, 2.0, 2.0, 0.25]);
}

#[test]
fn test_decode_numeric_length_matches_declared_counts() {
    let v = decode_numeric("-3.25x4,7,0x1,1e-3x2").unwrap();
    assert_eq!(v.len(), 4 + 1 + 1 + 2);
    assert_eq!(v[0], -3.25);
    assert_eq!(v[4], 7.0);
    assert_eq!(v[5], 0.0);
    assert_eq!(v[7], 0.001);
}

#[test]
fn test_decode_numeric_empty_and_blank_tokens() {
    assert!(decode_numeric("").unwrap().is_empty());
    assert_eq!(decode_numeric("1,,2,").unwrap(), vec![1.0, 2.0]);
    assert_eq!(decode_numeric(" 4 x 2 ").unwrap(), vec![4.0, 4.0]);
}

#[test]
fn test_decode_numeric_rejects_malformed_tokens() {
    assert!(matches!(
        decode_numeric("1,abc,3"),
        Err(DecodeError::InvalidNumber { .. })
    ));
    assert!(matches!(
        decode_numeric("2x0"),
        Err(DecodeError::InvalidCount { .. })
    ));
    assert!(matches!(
        decode_numeric("2x-1"),
        Err(DecodeError::InvalidCount { .. })
    ));
    assert!(matches!(
        decode_numeric("2x1.5"),
        Err(DecodeError::InvalidCount { .. })
    ));
    assert!(matches!(
        decode_numeric("NaN"),
        Err(DecodeError::NonFinite { .. })
    ));
}

#[test]
fn test_decode_numeric_rejects_oversized_repeat_counts() {
    assert_eq!(
        decode_numeric("1.0x18446744073709551615"),
        Err(DecodeError::TooLarge {
            token: "1.0x18446744073709551615".to_string()
        })
    );
    assert!(matches!(
        decode_numeric("0.5x274877906944"),
        Err(DecodeError::TooLarge { .. })
    ));

    // The limit applies to the running total, not to each token.
    let text = format!("1,2x{MAX_DECODED_VALUES}");
    assert_eq!(
        decode_numeric(&text),
        Err(DecodeError::TooLarge {
            token: format!("2x{MAX_DECODED_VALUES}")
        })
    );
}

#[test]
fn test_decode_labels() {
    assert!(decode_labels("").is_empty());
    assert_eq!(decode_labels("a,b,a"), vec!["a", "b", "a"]);
    assert_eq!(decode_labels("a,,b"), vec!["a", "", "b"]);
}

#[test]
fn test_encode_numeric_collapses_runs() {
    let text = encode_numeric(&[1.5, 2.0, 2.0, 2.0, 0.25]);
    assert_eq!(text, "1.5,2x3,0.25");
    assert_eq!(decode_numeric(&text).unwrap(), vec![1.5, 2.0, 2.0, 2.0, 0.25]);
    assert_eq!(encode_numeric(&[]), "");
}

#[test]
fn test_encode_labels() {
    assert_eq!(encode_labels(&["xcond_1", "xcond_2"]), "xcond_1,xcond_2");
    assert_eq!(encode_labels::<&str>(&[]), "");
}
