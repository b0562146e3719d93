// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Envelope and status assertions.

use axum::http::StatusCode;

use super::harness::TestResponse;

/// Asserts a 200 with non-null `data` and null `errors`.
#[track_caller]
pub fn assert_data(response: &TestResponse) {
    assert_eq!(response.status, StatusCode::OK, "body: {}", response.body);
    assert!(!response.data().is_null(), "expected data: {}", response.body);
    assert!(response.errors().is_null(), "unexpected errors: {}", response.body);
}

/// Asserts `status` with non-null `errors` and null `data`.
#[track_caller]
pub fn assert_error(response: &TestResponse, status: StatusCode) {
    assert_eq!(response.status, status, "body: {}", response.body);
    assert!(response.data().is_null(), "unexpected data: {}", response.body);
    assert!(
        response.errors().is_string(),
        "expected errors: {}",
        response.body
    );
}

/// Asserts the uniform 401 every auth failure produces.
#[track_caller]
pub fn assert_unauthorized(response: &TestResponse) {
    assert_error(response, StatusCode::UNAUTHORIZED);
    assert_eq!(response.errors(), "Unauthorized");
}

/// Asserts two responses are byte-for-byte the same to a client.
#[track_caller]
pub fn assert_indistinguishable(a: &TestResponse, b: &TestResponse) {
    assert_eq!(a.status, b.status);
    assert_eq!(a.body, b.body);
}
