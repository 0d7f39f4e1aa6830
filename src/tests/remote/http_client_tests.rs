use super::*;

fn call() -> Call<'static> {
    Call::new(EntityKind::Mission, "update mission").on("m1")
}

#[test]
fn auth_statuses_map_to_dedicated_errors() {
    assert!(matches!(
        classify(StatusCode::UNAUTHORIZED, b"", call()),
        PersistenceError::Unauthorized
    ));
    assert!(matches!(
        classify(StatusCode::FORBIDDEN, b"{}", call()),
        PersistenceError::InsufficientRights
    ));
}

#[test]
fn conflict_status_is_outdated() {
    match classify(StatusCode::CONFLICT, b"", call()) {
        PersistenceError::Outdated { kind, remote_id } => {
            assert_eq!(kind, EntityKind::Mission);
            assert_eq!(remote_id, "m1");
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn bad_request_with_conflict_code_is_outdated() {
    let body = br#"{"error":"outdated","code":"VERSION_CONFLICT"}"#;
    assert!(classify(StatusCode::BAD_REQUEST, body, call()).is_outdated());
}

#[test]
fn plain_bad_request_is_invalid_format() {
    match classify(StatusCode::BAD_REQUEST, br#"{"error":"name required"}"#, call()) {
        PersistenceError::InvalidFormat(msg) => assert_eq!(msg, "name required"),
        other => panic!("unexpected {other:?}"),
    }
    match classify(StatusCode::BAD_REQUEST, b"not json", call()) {
        PersistenceError::InvalidFormat(msg) => assert_eq!(msg, "update mission rejected"),
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn other_statuses_keep_their_code() {
    for code in [404u16, 500, 502] {
        let status = StatusCode::from_u16(code).unwrap();
        let err = classify(status, b"", call());
        assert_eq!(err.status_code(), Some(code));
        assert!(matches!(err, PersistenceError::Status { .. }));
    }
}
