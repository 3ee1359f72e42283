//! Full CRUD lifecycle over real HTTP.
//!
//! Starts the server on a random port with an in-memory pool, then drives it
//! with ureq from the test thread.

use std::sync::Arc;

use todo_core::{MemoryPool, PoolStats, Todo};

struct Reply {
    status: u16,
    body: String,
}

/// Send a request, returning 4xx/5xx responses as data rather than `Err`.
fn send(method: &str, url: &str, body: Option<&str>) -> Reply {
    let agent = ureq::Agent::config_builder()
        .http_status_as_error(false)
        .build()
        .new_agent();

    let mut response = match (method, body) {
        ("GET", _) => agent.get(url).call(),
        ("DELETE", _) => agent.delete(url).call(),
        ("POST", Some(body)) => agent.post(url).content_type("application/json").send(body.as_bytes()),
        ("PUT", Some(body)) => agent.put(url).content_type("application/json").send(body.as_bytes()),
        (other, _) => panic!("unsupported request: {other}"),
    }
    .expect("HTTP transport error");

    Reply {
        status: response.status().as_u16(),
        body: response.body_mut().read_to_string().unwrap_or_default(),
    }
}

fn start_server(pool: MemoryPool) -> String {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            todo_server::run(listener, Arc::new(pool)).await
        })
        .unwrap();
    });

    format!("http://{addr}")
}

#[test]
fn crud_lifecycle() {
    let pool = MemoryPool::new();
    let base = start_server(pool.clone());
    let todos_url = format!("{base}/todos");

    let reply = send("GET", &todos_url, None);
    assert_eq!(reply.status, 200);
    assert_eq!(reply.body, "[]");

    let reply = send("POST", &todos_url, Some(r#"{"title":"Buy milk"}"#));
    assert_eq!(reply.status, 201);
    let created: Todo = serde_json::from_str(&reply.body).unwrap();
    assert_eq!(created.title, "Buy milk");
    assert!(!created.completed);
    let todo_url = format!("{todos_url}/{}", created.id);

    let reply = send("PUT", &todo_url, Some(r#"{"title":"Buy milk","completed":true}"#));
    assert_eq!(reply.status, 200);
    let updated: Todo = serde_json::from_str(&reply.body).unwrap();
    assert_eq!(updated.id, created.id);
    assert!(updated.completed);

    let reply = send("GET", &todos_url, None);
    let todos: Vec<Todo> = serde_json::from_str(&reply.body).unwrap();
    assert_eq!(todos, vec![updated]);

    let reply = send("DELETE", &todo_url, None);
    assert_eq!(reply.status, 204);
    assert!(reply.body.is_empty());

    let reply = send("DELETE", &todo_url, None);
    assert_eq!(reply.status, 404);
    assert_eq!(reply.body, r#"{"error":"TODO not found"}"#);

    let reply = send("PUT", &format!("{todos_url}/999999"), Some(r#"{"title":"x","completed":false}"#));
    assert_eq!(reply.status, 404);
    assert_eq!(reply.body, r#"{"error":"TODO not found"}"#);

    let reply = send("GET", &todos_url, None);
    assert_eq!(reply.body, "[]");

    assert_eq!(pool.stats(), PoolStats { acquired: 8, released: 8 });
}
