use std::sync::Arc;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use httpmock::MockServer;
use url::Url;
use vebra_rs::{InMemorySessionStore, VebraClient};

pub const USER: &str = "feed-user";
pub const PASS: &str = "feed-pass";

pub const BRANCHES_XML: &str = "<branches>\
<branch><name>Main Office</name><url>http://x/branch/1</url></branch>\
<branch><name>North Office</name><url>http://x/branch/2</url></branch>\
</branches>";

pub const BRANCH_XML: &str =
    "<branch><name>Main Office</name><street>1 High St</street><town>Testham</town></branch>";

pub const PROPERTY_LIST_XML: &str = "<properties>\
<property id=\"7\"><updated>2024-03-05T07:08:09</updated></property>\
<property id=\"8\"><updated>2024-03-06T10:00:00</updated></property>\
</properties>";

pub const PROPERTY_XML: &str =
    "<property id=\"7\"><address><street>2 Low Rd</street></address><price>250000</price></property>";

/// Base URL matching the layout of the real service, pointed at the mock.
pub fn base_url(server: &MockServer) -> Url {
    Url::parse(&format!("{}/export/F/v7", server.base_url())).unwrap()
}

/// A client against the mock server, plus a handle on its token store so
/// tests can seed and inspect the session.
pub fn client_with_store(server: &MockServer) -> (VebraClient, Arc<InMemorySessionStore>) {
    let store = Arc::new(InMemorySessionStore::new());
    let client = VebraClient::builder()
        .credentials(USER, PASS)
        .base_url(base_url(server))
        .session_store(store.clone())
        .build()
        .unwrap();
    (client, store)
}

pub fn client(server: &MockServer) -> VebraClient {
    client_with_store(server).0
}

/// The Authorization value reqwest produces for Basic credentials.
pub fn basic_auth(user: &str, pass: &str) -> String {
    format!("Basic {}", BASE64.encode(format!("{user}:{pass}")))
}

/// The Authorization value the client produces for a captured token whose
/// raw `Token` header value was `raw`.
pub fn token_auth(raw: &str) -> String {
    format!("Basic {}", BASE64.encode(raw))
}

/// The stored (base64) form of a raw token value.
pub fn stored_token(raw: &str) -> String {
    BASE64.encode(raw)
}
