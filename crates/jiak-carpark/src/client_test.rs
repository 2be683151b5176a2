use super::*;

fn test_client(base_url: &str) -> DatamallClient {
    DatamallClient::with_base_url("test-key", 5, "jiak-test/0.1", base_url)
        .expect("client construction should not fail")
}

#[test]
fn page_url_appends_endpoint_and_literal_skip() {
    let client = test_client("https://datamall2.mytransport.sg/ltaodataservice");
    let url = client.page_url(500).unwrap();
    assert_eq!(
        url.as_str(),
        "https://datamall2.mytransport.sg/ltaodataservice/CarParkAvailabilityv2?$skip=500"
    );
}

#[test]
fn page_url_tolerates_trailing_slashes() {
    let client = test_client("https://datamall2.mytransport.sg/ltaodataservice//");
    let url = client.page_url(0).unwrap();
    assert_eq!(
        url.as_str(),
        "https://datamall2.mytransport.sg/ltaodataservice/CarParkAvailabilityv2?$skip=0"
    );
}

#[test]
fn invalid_base_url_is_rejected() {
    let result = DatamallClient::with_base_url("k", 5, "ua", "not a url");
    assert!(
        matches!(result, Err(CarparkError::InvalidBaseUrl { .. })),
        "expected InvalidBaseUrl"
    );
}
