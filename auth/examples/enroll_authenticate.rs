use auth::{AuthConfig, AuthService, MemoryStore};

fn main() {
    tracing_subscriber::fmt::init();

    let config = AuthConfig::from_env().expect("configuration");
    let service = AuthService::new(config, MemoryStore::new()).expect("circuit compiles");

    let requests: [(&str, &[u8]); 5] = [
        ("/generateCommitment", br#"{"user_secret": 123}"#),
        ("/enroll", br#"{"user_name": "alice", "user_secret": 123}"#),
        ("/authenticate", br#"{"user_name": "alice", "user_secret": "123"}"#),
        ("/authenticate", br#"{"user_name": "alice", "user_secret": "124"}"#),
        ("/authenticate", br#"{"user_name": "alice", "user_secret": "abc"}"#),
    ];

    for (path, body) in requests {
        let response = service.handle(path, body);
        println!("{path} -> {} {}", response.status, response.body);
    }

    let snapshot = service.store().snapshot().expect("snapshot");
    let restored = MemoryStore::restore(&snapshot).expect("restore");
    let restored = AuthService::new(service.config().clone(), restored).expect("circuit compiles");
    let response = restored.handle(
        "/authenticate",
        br#"{"user_name": "alice", "user_secret": 123}"#,
    );
    assert_eq!(response.status, 200);
    println!("restored store accepts alice: {}", response.body);
}
