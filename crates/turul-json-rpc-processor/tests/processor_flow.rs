//! End-to-end message flows through the processor boundary

use serde_json::{Value, json};
use turul_json_rpc_processor::prelude::*;

fn good_methods() -> Value {
    json!({
        "getRandomAnimal": {
            "request": {"title": "getRandomAnimal", "type": "object"}
        },
        "add": {
            "request": {
                "title": "add",
                "type": "object",
                "properties": {
                    "number1": {"type": "number", "minimum": 0},
                    "number2": {"type": "number", "minimum": 0}
                },
                "required": ["number1", "number2"]
            }
        }
    })
}

fn bad_methods() -> Value {
    json!({
        "getRandomAnimal": {
            "request": {"title": "getRandomAnimal", "type": "object"}
        },
        "add": {
            "request": {
                "tile": "add",
                "type": "objecte",
                "properties": {
                    "number1": {"type": "cat", "minimum": 0},
                    "number2": {"type": "dog", "minimum": 0}
                },
                "required": ["number1", "number2"]
            }
        }
    })
}

fn processor() -> JsonRpcProcessor {
    JsonRpcProcessor::new(ProcessorConfig::default()).unwrap()
}

fn send(processor: &mut JsonRpcProcessor, message: Value) -> OutboundMessage {
    processor
        .handle_message(message)
        .unwrap()
        .expect("message should produce output")
}

#[test]
fn valid_methods_are_compiled() {
    let mut processor = processor();
    assert!(processor.handle_message(json!({"methods": good_methods()})).unwrap().is_none());

    let registry = processor.registry();
    assert_eq!(registry.registered_methods(), vec!["add", "getRandomAnimal"]);
    assert_eq!(
        registry.lookup("add").unwrap().param_schema(),
        &good_methods()["add"]["request"]
    );
}

#[test]
fn invalid_method_schema_only_drops_that_method() {
    let mut processor = processor();
    processor.handle_message(json!({"methods": good_methods()})).unwrap();
    processor.handle_message(json!({"methods": bad_methods()})).unwrap();

    assert!(processor.registry().lookup("getRandomAnimal").is_some());
    assert!(processor.registry().lookup("add").is_none());
}

#[test]
fn retain_last_good_policy_keeps_working_method() {
    let mut processor = JsonRpcProcessor::new(
        ProcessorConfig::default().with_recompile_policy(RecompilePolicy::RetainLastGood),
    )
    .unwrap();
    processor.handle_message(json!({"methods": good_methods()})).unwrap();
    processor.handle_message(json!({"methods": bad_methods()})).unwrap();

    let output = send(
        &mut processor,
        json!({"payload": {"jsonrpc": "2.0", "method": "add", "params": {"number1": 1, "number2": 2}, "id": 1}}),
    );
    assert_eq!(output.channel, Channel::Success);
}

#[test]
fn wrong_version_is_invalid_request() {
    let mut processor = processor();
    let output = send(
        &mut processor,
        json!({"payload": {
            "jsonrpc": "3.0",
            "method": "add",
            "params": {"number1": 3, "number2": "Hello"},
            "id": "x"
        }}),
    );

    assert_eq!(output.channel, Channel::Error);
    assert_eq!(output.payload["jsonrpc"], json!("2.0"));
    assert_eq!(output.payload["id"], json!("x"));
    assert_eq!(output.payload["error"]["code"], json!(-32600));
    assert_eq!(output.payload["error"]["message"], json!("Invalid Request"));
    assert_eq!(output.payload["error"]["data"][1]["jsonrpc"], json!("3.0"));
}

#[test]
fn malformed_payload_is_parse_error() {
    let mut processor = processor();
    for payload in [json!("{{}}"), json!({"foo": "bar", "id": 12})] {
        let output = send(&mut processor, json!({"payload": payload}));

        assert_eq!(output.channel, Channel::Error);
        assert_eq!(output.payload["error"]["code"], json!(-32700));
        assert_eq!(output.payload["error"]["message"], json!("Parse error"));
        assert_eq!(output.payload["id"], Value::Null);
    }
}

#[test]
fn falsy_method_is_parse_error() {
    let mut processor = processor();
    for payload in [
        json!({"method": null, "id": 5}),
        json!({"method": "", "jsonrpc": "1.0", "id": 6}),
    ] {
        let output = send(&mut processor, json!({"payload": payload}));

        assert_eq!(output.payload["error"]["code"], json!(-32700));
        assert_eq!(output.payload["id"], Value::Null);
    }
}

#[test]
fn unknown_method_is_not_found() {
    let mut processor = processor();
    let output = send(
        &mut processor,
        json!({"payload": {"jsonrpc": "2.0", "method": "getRandomAnimal", "params": {}, "id": "1234"}}),
    );

    assert_eq!(output.channel, Channel::Error);
    assert_eq!(output.payload["id"], json!("1234"));
    assert_eq!(output.payload["error"]["code"], json!(-32601));
    assert_eq!(
        output.payload["error"]["message"],
        json!("Method getRandomAnimal not found")
    );
}

#[test]
fn valid_params_are_forwarded_with_correlation() {
    let mut processor = processor();
    processor.handle_message(json!({"methods": good_methods()})).unwrap();

    let output = send(
        &mut processor,
        json!({"payload": {"jsonrpc": "2.0", "method": "getRandomAnimal", "params": {}, "id": "1234"}}),
    );

    assert_eq!(output.channel, Channel::Success);
    assert_eq!(
        output.to_value(),
        json!({
            "payload": {},
            "rpcMethod": "getRandomAnimal",
            "rpcData": {"id": "1234", "method": "getRandomAnimal"}
        })
    );
}

#[test]
fn wrong_params_are_invalid_params() {
    let mut processor = processor();
    processor.handle_message(json!({"methods": good_methods()})).unwrap();

    let output = send(
        &mut processor,
        json!({"payload": {"jsonrpc": "2.0", "method": "add", "params": {"number1": -3, "number2": 5}, "id": "1234"}}),
    );

    assert_eq!(output.channel, Channel::Error);
    assert_eq!(output.payload["id"], json!("1234"));
    assert_eq!(output.payload["error"]["code"], json!(-32602));
    assert_eq!(output.payload["error"]["message"], json!("Invalid params"));

    let message = output.to_value();
    assert_eq!(message["rpcMethod"], json!("add"));
    assert_eq!(message["rpcData"], json!({"id": "1234", "method": "add"}));
}

#[test]
fn invalid_params_data_echoes_request_as_received() {
    let mut processor = processor();
    processor.handle_message(json!({"methods": good_methods()})).unwrap();

    let payload = json!({
        "jsonrpc": "2.0",
        "method": "add",
        "params": {"number1": 1},
        "id": null,
        "extra": [1, 2]
    });
    let output = send(&mut processor, json!({"payload": payload.clone()}));

    assert_eq!(output.payload["error"]["code"], json!(-32602));
    assert_eq!(output.payload["id"], Value::Null);
    assert_eq!(output.payload["error"]["data"][1], payload);
}

#[test]
fn forwarded_result_round_trips_into_response() {
    let mut processor = processor();
    processor.handle_message(json!({"methods": good_methods()})).unwrap();

    let forwarded = send(
        &mut processor,
        json!({"payload": {"jsonrpc": "2.0", "method": "add", "params": {"number1": 3, "number2": 4}, "id": "x"}}),
    );
    assert_eq!(forwarded.payload, json!({"number1": 3, "number2": 4}));

    // The external handler answers with a bare result and the echoed fields
    let mut reply = forwarded.to_value();
    reply["payload"] = json!(7);

    let response = send(&mut processor, reply);
    assert_eq!(response.channel, Channel::Success);
    assert_eq!(response.payload, json!({"jsonrpc": "2.0", "result": 7, "id": "x"}));
}

#[test]
fn application_failure_is_formatted() {
    let mut processor = processor();
    let output = send(
        &mut processor,
        json!({
            "error": {"message": "Animal shelter offline", "source": {"id": "n7", "type": "http request"}},
            "rpcData": {"id": "1234", "method": "getRandomAnimal"},
            "req": {}
        }),
    );

    assert_eq!(output.channel, Channel::Error);
    assert_eq!(output.status_code, Some(500));
    assert_eq!(
        output.payload,
        json!({
            "jsonrpc": "2.0",
            "error": {
                "code": -31999,
                "message": "Animal shelter offline",
                "data": {"id": "n7", "type": "http request"}
            },
            "id": "1234"
        })
    );
}

#[test]
fn application_failure_with_chosen_code() {
    let mut processor = processor();
    let output = send(
        &mut processor,
        json!({
            "error": {"message": "Quota exceeded"},
            "rpcErrorCode": -32050,
            "rpcData": {"id": 5, "method": "add"}
        }),
    );

    assert_eq!(output.status_code, None);
    assert_eq!(output.payload["error"]["code"], json!(-32050));
    assert_eq!(output.payload["id"], json!(5));
}

#[test]
fn http_requests_get_error_status() {
    let mut processor = processor();
    let output = send(
        &mut processor,
        json!({
            "payload": {"jsonrpc": "2.0", "method": "missing", "params": [], "id": 1},
            "req": {"method": "POST"}
        }),
    );
    assert_eq!(output.status_code, Some(500));
    assert_eq!(output.to_value()["statusCode"], json!(500));
}

#[test]
fn boundary_text_is_decoded() {
    let mut processor = processor();
    assert!(processor
        .handle_str(r#"{"methods": {"ping": {"request": {}}}}"#)
        .unwrap()
        .is_none());
    assert!(processor.registry().lookup("ping").is_some());

    let output = processor
        .handle_str(r#"{"payload": {"jsonrpc": "2.0", "method": "ping", "id": 1}}"#)
        .unwrap()
        .expect("request should produce output");
    assert_eq!(output.channel, Channel::Success);

    assert!(matches!(
        processor.handle_str("not json"),
        Err(ProcessorError::Json(_))
    ));
}

#[test]
fn unrecognized_message_is_an_error() {
    let mut processor = processor();
    assert!(matches!(
        processor.handle_message(json!({"topic": "nothing"})),
        Err(ProcessorError::UnrecognizedMessage(_))
    ));
}
