//! Verify request builders and `parse` against JSON test vectors stored in
//! `test-vectors/`.
//!
//! Each vector file describes inputs, expected requests, simulated responses
//! and the expected status and body checks.

use petfriends_core::{AuthKey, Credentials, HttpMethod, HttpRequest, HttpResponse, PetFilter, PetFriendsClient, PetList};

const BASE_URL: &str = "http://localhost:3000";

fn client() -> PetFriendsClient {
    PetFriendsClient::new(BASE_URL)
}

/// Parse the method string from test vectors into `HttpMethod`.
fn parse_method(s: &str) -> HttpMethod {
    match s {
        "GET" => HttpMethod::Get,
        "POST" => HttpMethod::Post,
        "PUT" => HttpMethod::Put,
        "DELETE" => HttpMethod::Delete,
        other => panic!("unknown method: {other}"),
    }
}

fn check_request(name: &str, req: &HttpRequest, expected: &serde_json::Value) {
    assert_eq!(req.method, parse_method(expected["method"].as_str().unwrap()), "{name}: method");
    assert_eq!(req.path, format!("{BASE_URL}{}", expected["path"].as_str().unwrap()), "{name}: path");

    let expected_headers: Vec<(String, String)> = expected["headers"]
        .as_array()
        .unwrap()
        .iter()
        .map(|h| {
            let arr = h.as_array().unwrap();
            (arr[0].as_str().unwrap().to_string(), arr[1].as_str().unwrap().to_string())
        })
        .collect();
    assert_eq!(req.headers, expected_headers, "{name}: headers");
    assert!(req.body.is_none(), "{name}: body should be None");
}

fn simulated(case: &serde_json::Value) -> HttpResponse {
    let sim = &case["simulated_response"];
    HttpResponse {
        status: sim["status"].as_u64().unwrap() as u16,
        body: sim["body"].as_str().unwrap().to_string(),
    }
}

fn cases(raw: &str) -> Vec<serde_json::Value> {
    let vectors: serde_json::Value = serde_json::from_str(raw).unwrap();
    vectors["cases"].as_array().unwrap().clone()
}

// ---------------------------------------------------------------------------
// Key
// ---------------------------------------------------------------------------

#[test]
fn api_key_test_vectors() {
    let c = client();
    for case in cases(include_str!("../../test-vectors/api_key.json")) {
        let name = case["name"].as_str().unwrap();
        let input = &case["input"];
        let credentials = Credentials::new(
            input["email"].as_str().unwrap(),
            input["password"].as_str().unwrap(),
        );

        check_request(name, &c.build_get_api_key(&credentials), &case["expected_request"]);

        let resp = c.parse(simulated(&case));
        assert_eq!(u64::from(resp.status), case["expected_status"].as_u64().unwrap(), "{name}: status");
        if let Some(key) = case.get("expected_key") {
            let parsed: AuthKey = resp.decode().unwrap();
            assert_eq!(parsed.key, key.as_str().unwrap(), "{name}: key");
        }
        if let Some(needle) = case.get("expected_substring") {
            assert!(resp.body.contains(needle.as_str().unwrap()), "{name}: body text");
        }
    }
}

// ---------------------------------------------------------------------------
// List
// ---------------------------------------------------------------------------

#[test]
fn list_test_vectors() {
    let c = client();
    for case in cases(include_str!("../../test-vectors/list.json")) {
        let name = case["name"].as_str().unwrap();
        let key = AuthKey::new(case["key"].as_str().unwrap());
        let filter = PetFilter::try_from(case["filter"].as_str().unwrap()).unwrap();

        check_request(name, &c.build_list_pets(&key, filter), &case["expected_request"]);

        let resp = c.parse(simulated(&case));
        assert_eq!(u64::from(resp.status), case["expected_status"].as_u64().unwrap(), "{name}: status");
        if let Some(ids) = case.get("expected_ids") {
            let list: PetList = resp.decode().unwrap();
            let got: Vec<&str> = list.pets.iter().map(|p| p.id.as_str()).collect();
            let want: Vec<&str> = ids.as_array().unwrap().iter().map(|v| v.as_str().unwrap()).collect();
            assert_eq!(got, want, "{name}: ids");
        }
        if let Some(needle) = case.get("expected_substring") {
            assert!(resp.body.contains(needle.as_str().unwrap()), "{name}: body text");
            assert!(resp.decode::<PetList>().is_err(), "{name}: error page is not a pet list");
        }
    }
}

// ---------------------------------------------------------------------------
// Delete
// ---------------------------------------------------------------------------

#[test]
fn delete_test_vectors() {
    let c = client();
    for case in cases(include_str!("../../test-vectors/delete.json")) {
        let name = case["name"].as_str().unwrap();
        let key = AuthKey::new(case["key"].as_str().unwrap());
        let id = case["input_id"].as_str().unwrap();

        check_request(name, &c.build_delete_pet(&key, id), &case["expected_request"]);

        let resp = c.parse(simulated(&case));
        assert_eq!(u64::from(resp.status), case["expected_status"].as_u64().unwrap(), "{name}: status");
        if let Some(needle) = case.get("expected_substring") {
            assert!(resp.body.contains(needle.as_str().unwrap()), "{name}: body text");
        }
    }
}
