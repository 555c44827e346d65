// Registration contract, exercised through the public API only
use athen_core::{Document, Handler, Mode, Query, Registry, Value};

#[test]
fn register_returns_the_handler_it_was_given() {
    let mut registry = Registry::new();
    for mode in ["init", "run", "", "custom-tag"] {
        let handler = Handler::new("f", |_state, _query| Ok(Value::Null));
        let returned = registry.register(handler.clone(), mode);
        assert!(Handler::ptr_eq(&returned, &handler), "mode {:?}", mode);
    }
    assert_eq!(registry.len(), 4);
}

#[test]
fn returned_handler_stays_directly_callable() {
    let mut registry = Registry::new();
    let double = registry.register(
        Handler::new("double", |_state, query| {
            let n = query.get("n").and_then(|item| item.as_f64()).unwrap_or(0.0);
            Ok(Value::from(n * 2.0))
        }),
        Mode::Run,
    );

    let mut state = athen_core::State::new();
    let result = double.call(&mut state, &Query::new().with_number("n", 21)).unwrap();
    assert_eq!(result, Value::from(42.0));
}

#[test]
fn registration_without_mode_defaults_to_run() {
    let mut registry = Registry::new();
    registry.register_default(Handler::new("run", |_state, _query| Ok(Value::Null)));
    registry
        .registrar()
        .wrap(Handler::new("also_run", |_state, _query| Ok(Value::Null)));

    assert_eq!(Mode::default(), Mode::Run);
    assert_eq!(registry.count(&Mode::Run), 2);
    assert_eq!(registry.modes(), vec![&Mode::Run]);
}

#[test]
fn modes_may_repeat() {
    let mut registry = Registry::new();
    registry.register(Handler::new("a", |_state, _query| Ok(Value::from(1))), "run");
    registry.register(Handler::new("b", |_state, _query| Ok(Value::from(2))), "run");

    let names: Vec<&str> = registry.handlers(&Mode::Run).map(Handler::name).collect();
    assert_eq!(names, vec!["a", "b"]);
}

#[test]
fn init_state_is_visible_to_run_regardless_of_query() {
    let mut document = Document::new("data");
    let mut init = document.registry_mut().registrar().mode("init");
    init.wrap(Handler::new("init", |state, _query| {
        state.set("data", "EWEWEEE");
        Ok(Value::Null)
    }));
    document.registry_mut().registrar().mode("run").wrap(Handler::new(
        "run",
        |state, _query| Ok(state.get("data").cloned().unwrap_or(Value::from("<Y DATA"))),
    ));

    document.init().unwrap();

    for query in [
        Query::new(),
        Query::new().with_str("q", "anything"),
        Query::parse(r#"{"q": 7}"#),
    ] {
        assert_eq!(document.run(&query).unwrap(), Value::from("EWEWEEE"));
    }
}
