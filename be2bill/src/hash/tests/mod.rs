use super::*;
use crate::amount::{Amount, FragmentedAmount, SingleAmount};


fn capture_notification() -> Params {
    Params::new()
        .with("DESCRIPTION", "Capture test 01")
        .with("IDENTIFIER", "IDENTIFIER")
        .with("OPERATIONTYPE", "capture")
        .with("ORDERID", "order_21")
        .with("TRANSACTIONID", "test1")
        .with("VERSION", "2.0")
        .with("HASH", "ea22191f962b6fc708f48baff8600f8caaea3afa7e8be3f2d2dafb3249396e72")
}

#[test]
fn test_check_hash_capture_notification() {
    assert!(check_hash(&Sha256Hasher, "PASSWORD", &capture_notification()));
    assert!(verify("PASSWORD", &capture_notification()).is_ok());
}

#[test]
fn test_check_hash_wrong_password() {
    assert!(!check_hash(&Sha256Hasher, "password", &capture_notification()));
    assert!(matches!(verify("password", &capture_notification()), Err(Be2billError::InvalidSignature)));
}

#[test]
fn test_check_hash_missing_hash() {
    let mut params = capture_notification();
    params.remove("HASH");
    assert!(!check_hash(&Sha256Hasher, "PASSWORD", &params));
}

#[test]
fn test_check_hash_non_text_hash() {
    let params = capture_notification().with("HASH", 12);
    assert!(!check_hash(&Sha256Hasher, "PASSWORD", &params));
}

#[test]
fn test_sign_replaces_existing_hash() {
    let mut params = Params::new().with("a", "1").with("HASH", "stale");
    sign(&Sha256Hasher, "secret", &mut params);
    assert_ne!(params.get_text("HASH"), Some("stale"));
    assert!(verify("secret", &params).is_ok());
}

#[test]
fn test_single_amount_hashes_like_decimal_string() {
    let mut with_amount = Params::new();
    Amount::Single(SingleAmount(15235)).apply_to(&mut with_amount);
    let with_string = Params::new().with("AMOUNT", "15235");

    assert_eq!(compute_hash("password", &with_amount), compute_hash("password", &with_string));
}

#[test]
fn test_fragmented_amount_hashes_like_nested_strings() {
    let schedule = FragmentedAmount::from_iso_dates([("2010-05-14", 15235), ("2012-06-04", 14723)]).unwrap();
    let mut with_amount = Params::new();
    Amount::Fragmented(schedule).apply_to(&mut with_amount);
    let with_strings = Params::new().with(
        "AMOUNTS",
        Params::new().with("2012-06-04", "14723").with("2010-05-14", "15235"),
    );

    assert_eq!(compute_hash("password", &with_amount), compute_hash("password", &with_strings));
}

#[test]
fn test_custom_hasher_is_used() {
    #[derive(Debug)]
    struct FixedHasher;

    impl Hasher for FixedHasher {
        fn compute_hash(&self, _password: &str, _params: &Params) -> String {
            "fixed".to_owned()
        }
    }

    let mut params = Params::new().with("a", "1");
    sign(&FixedHasher, "pw", &mut params);
    assert_eq!(params.get_text("HASH"), Some("fixed"));
    assert!(check_hash(&FixedHasher, "pw", &params));
    assert!(!check_hash(&Sha256Hasher, "pw", &params));
}
