pub mod mock;
pub mod telemetry;

use actix_web::{
    App, HttpRequest, HttpResponse, HttpServer, Responder, get, route, web,
};
use serde_json::json;
use std::net::TcpListener;
use std::time::Duration;
use tracing_log::LogTracer;
use tracing_subscriber::util::SubscriberInitExt;

pub use mock::MockTransport;

/// How long `/slow` takes to answer.
pub const SLOW_DELAY: Duration = Duration::from_secs(5);

/// Non-canonical reason phrase sent by `/maintenance`.
pub const MAINTENANCE_REASON: &str = "Down For Maintenance";

/// Header echoed back by `/echo`.
pub const ECHO_HEADER: &str = "x-echo";

pub struct FixtureServer {
    pub port: u16,
    pub address: String,
}

impl FixtureServer {
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.address)
    }
}

/// Install a test subscriber once. Later calls are no-ops.
pub fn init_tracing() {
    let subscriber = telemetry::get_subscriber("error".into());
    let _ = LogTracer::init();
    let _ = subscriber.try_init();
}

/// Start the fixture server on an OS-assigned port for parallel testing.
pub async fn spawn_fixture_server() -> FixtureServer {
    init_tracing();

    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    let server = HttpServer::new(|| {
        App::new()
            .service(products)
            .service(hello)
            .service(missing)
            .service(maintenance)
            .service(broken)
            .service(slow)
            .service(echo)
    })
    .workers(1)
    .listen(listener)
    .unwrap()
    .run();
    tokio::spawn(server);

    FixtureServer {
        port,
        address: format!("http://127.0.0.1:{port}"),
    }
}

/// The body served at `/products`.
pub fn product_fixture() -> serde_json::Value {
    json!([
        {
            "id": 1,
            "title": "Classic Heather Gray Hoodie",
            "price": 69,
            "images": ["https://i.imgur.com/cHddUCu.jpeg"]
        },
        {
            "id": 2,
            "title": "Sleek Wireless Headphones",
            "price": 57,
            "images": []
        }
    ])
}

#[get("/products")]
async fn products() -> impl Responder {
    HttpResponse::Ok().json(product_fixture())
}

#[get("/hello")]
async fn hello() -> impl Responder {
    HttpResponse::Ok().content_type("text/plain").body("hello")
}

#[get("/missing")]
async fn missing() -> impl Responder {
    HttpResponse::NotFound().finish()
}

#[get("/maintenance")]
async fn maintenance() -> HttpResponse {
    let mut response = HttpResponse::ServiceUnavailable().finish();
    response.head_mut().reason = Some(MAINTENANCE_REASON);
    response
}

#[get("/broken")]
async fn broken() -> impl Responder {
    HttpResponse::Ok()
        .content_type("application/json")
        .body("{\"id\": ")
}

#[get("/slow")]
async fn slow() -> impl Responder {
    tokio::time::sleep(SLOW_DELAY).await;
    HttpResponse::Ok().content_type("text/plain").body("slow")
}

#[route("/echo", method = "GET", method = "POST", method = "PUT")]
async fn echo(request: HttpRequest, body: web::Bytes) -> impl Responder {
    let header = request
        .headers()
        .get(ECHO_HEADER)
        .and_then(|value| value.to_str().ok());
    HttpResponse::Ok().json(json!({
        "method": request.method().as_str(),
        "header": header,
        "body": String::from_utf8_lossy(&body),
    }))
}
