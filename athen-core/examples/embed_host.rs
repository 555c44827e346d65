//! Embedding example: build a catalog in code and route a few requests
//!
//! Run with: cargo run --example embed_host

use athen_core::{Catalog, Handler, Host, HostConfig, Mode, Registry, Value};

fn install_visits(registry: &mut Registry) {
    registry.register(
        Handler::new("init", |state, _query| {
            state.set("visits", 0);
            Ok(Value::Null)
        }),
        Mode::Init,
    );
    registry.register_default(Handler::new("run", |state, query| {
        let visits = state.get("visits").and_then(Value::as_i64).unwrap_or(0) + 1;
        state.set("visits", visits);
        let who = query
            .get("name")
            .and_then(|item| item.as_str())
            .unwrap_or("stranger");
        Ok(Value::from(format!("hello {}, visit #{}", who, visits)))
    }));
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();

    let mut catalog = Catalog::builtin();
    catalog.add("visits", install_visits);

    let config = HostConfig::new()
        .add_document("hello", "hello")
        .add_document("visits", "visits");

    let host = match Host::from_config(config, &catalog) {
        Ok(host) => host,
        Err(e) => {
            eprintln!("Error building host: {}", e);
            return;
        }
    };

    for target in [
        "/",
        "/hello/x",
        "/visits/x?q=%7B%22name%22%3A%22ada%22%7D",
        "/visits/x",
        "/missing",
    ] {
        let reply = host.handle("GET", target);
        println!("{:<45} {} {}", target, reply.status, reply.body);
    }
}
