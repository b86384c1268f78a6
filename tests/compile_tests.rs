//! End-to-end compile tests
//!
//! Runs fixture documents through the full reader → decoder → builder →
//! validator pipeline.

use std::path::{Path, PathBuf};

use serde_json::json;
use wolfes_cg::ir::{Lang, MsgType, Platform, ProtocolType, TimerType};
use wolfes_cg::{
    decoder, CompileError, Compiler, DiagnosticCode, Diagnostics, ErrorCode, IrBuilder,
    IrValidator,
};

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures").join(name)
}

fn compile_fixture(name: &str) -> (Result<wolfes_cg::Ir, CompileError>, Diagnostics) {
    let mut diags = Diagnostics::new();
    let path = fixture(name);
    let result = Compiler::new().compile_file(path.to_str().unwrap(), &mut diags);
    (result, diags)
}

// =============================================================================
// Successful builds
// =============================================================================

#[test]
fn test_minimal_document() {
    let (ir, diags) = compile_fixture("minimal.jsonc");
    let ir = ir.unwrap();

    assert_eq!(ir.platform, Platform::Linux);
    assert_eq!(ir.lang, Lang::Cpp);
    assert_eq!(ir.apps.len(), 1);

    let app = &ir.apps[0];
    assert_eq!(app.namespace, "demo");
    assert_eq!(app.domain_id, 0);
    assert_eq!(app.nodes.len(), 1);

    let node = &app.nodes[0];
    assert_eq!(node.classname, "DemoNode");
    assert_eq!(node.timers.len(), 1);
    assert_eq!(node.timers[0].id, "_timer_0");
    assert_eq!(node.timers[0].callback, "__Timer0Cb");
    assert_eq!(node.timers[0].timer_type, TimerType::Steady);

    // domain_id, identifier and cb_function were defaulted
    assert_eq!(diags.with_code(DiagnosticCode::OptionalFieldDefaulted).count(), 3);
    assert!(IrValidator::new().is_valid(&ir));
}

#[test]
fn test_full_document() {
    let (ir, diags) = compile_fixture("full.jsonc");
    let ir = ir.unwrap();

    assert_eq!(ir.platform, Platform::Qnx);
    assert_eq!(ir.lang, Lang::Rust);
    assert_eq!(ir.version.build, 7);

    let summary = ir.summary();
    assert_eq!(summary.apps, 2);
    assert_eq!(summary.nodes, 3);
    assert_eq!(summary.timers, 2);
    assert_eq!(summary.topic_pubs, 1);
    assert_eq!(summary.topic_subs, 1);
    assert_eq!(summary.service_servers, 1);
    assert_eq!(summary.service_clients, 1);
    assert_eq!(summary.modules, 1);

    let perception = &ir.apps[0];
    assert_eq!(perception.domain_id, 12);
    assert_eq!(perception.protocol_type, ProtocolType::Sedds);
    assert_eq!(perception.scheduler_config.as_deref(), Some("qos/scheduler.json"));

    let lidar = &perception.nodes[0];
    assert_eq!(lidar.qos_config.as_deref(), Some("qos/default_qos.xml"));
    assert_eq!(lidar.timers[0].callback, "OnHeartbeat");
    assert_eq!(lidar.timers[1].id, "_timer_1");
    assert_eq!(lidar.timers[1].callback, "__Timer1Cb");
    assert_eq!(lidar.topic_pubs[0].message.msg_type, MsgType::Custom);
    assert_eq!(lidar.topic_pubs[0].message.src.as_deref(), Some("msgs/point_cloud.proto"));
    assert_eq!(lidar.topic_subs[0].id, "_topic_sub_0");
    assert_eq!(lidar.topic_subs[0].message.name, "sensor_msgs/Imu");

    let planner = &perception.nodes[1];
    assert_eq!(planner.service_servers[0].id, "_service_server_0");
    assert_eq!(planner.service_servers[0].function, "__ServiceServer0Res");
    assert_eq!(planner.service_clients[0].function, "RequestMap");

    assert_eq!(
        perception.identifiers,
        vec![
            "LidarNode",
            "heartbeat",
            "OnHeartbeat",
            "_timer_1",
            "__Timer1Cb",
            "cloud_pub",
            "PublishCloud",
            "_topic_sub_0",
            "__TopicSub0Cb",
            "PlannerNode",
            "_service_server_0",
            "__ServiceServer0Res",
            "map_client",
            "RequestMap",
        ]
    );

    // same class name in a second app is fine
    assert_eq!(ir.apps[1].nodes[0].classname, "LidarNode");
    assert!(ir.custom_msgs.is_empty());
    assert_eq!(diags.with_code(DiagnosticCode::NotYetImplemented).count(), 1);
}

#[test]
fn test_dump_shape() {
    let (ir, _) = compile_fixture("minimal.jsonc");
    let json = serde_json::to_value(ir.unwrap()).unwrap();
    assert_eq!(json["lang"], "CPP");
    assert_eq!(json["apps"][0]["nodes"][0]["timers"][0]["callback"], "__Timer0Cb");
}

// =============================================================================
// Failures
// =============================================================================

fn minimal_with(edit: impl FnOnce(&mut serde_json::Value)) -> serde_json::Value {
    let text = std::fs::read_to_string(fixture("minimal.jsonc")).unwrap();
    let mut doc = decoder::decode(&text).unwrap();
    edit(&mut doc);
    doc
}

#[test]
fn test_unsupported_version_fails_validation_only() {
    let doc = minimal_with(|doc| doc["wolfes_version"] = json!("2.0.0"));

    let mut diags = Diagnostics::new();
    let ir = IrBuilder::new(&mut diags).build(&doc).unwrap();
    assert_eq!(ir.apps[0].nodes[0].timers[0].id, "_timer_0");

    let err = IrValidator::new().validate(&ir).unwrap_err();
    assert!(matches!(err, CompileError::UnsupportedVersion { .. }));
    assert!(!IrValidator::new().is_valid(&ir));
}

#[test]
fn test_duplicate_identifier_in_one_node() {
    let doc = minimal_with(|doc| {
        doc["apps"][0]["nodes"][0]["topic_pubs"] = json!([
            { "identifier": "sensor_pub", "topic_name": "/a", "message": "A", "msg_type": 0 },
            { "identifier": "sensor_pub", "topic_name": "/b", "message": "B", "msg_type": 0 }
        ]);
    });
    let mut diags = Diagnostics::new();
    let err = IrBuilder::new(&mut diags).build(&doc).unwrap_err();
    assert_eq!(err.code(), ErrorCode::FileInvalid);
    match err {
        CompileError::DuplicateIdentifier { duplicates, .. } => {
            assert_eq!(duplicates, vec!["sensor_pub"]);
        }
        other => panic!("Expected DuplicateIdentifier, got {:?}", other),
    }
}

#[test]
fn test_duplicate_across_nodes_of_one_app() {
    let doc = minimal_with(|doc| {
        let nodes = doc["apps"][0]["nodes"].as_array_mut().unwrap();
        nodes.push(json!({ "classname": "DemoNode" }));
    });
    let mut diags = Diagnostics::new();
    let err = IrBuilder::new(&mut diags).build(&doc).unwrap_err();
    assert!(matches!(err, CompileError::DuplicateIdentifier { .. }));
}

#[test]
fn test_classname_with_leading_digit() {
    let doc = minimal_with(|doc| doc["apps"][0]["nodes"][0]["classname"] = json!("123bad"));
    let mut diags = Diagnostics::new();
    let err = IrBuilder::new(&mut diags).build(&doc).unwrap_err();
    assert!(matches!(err, CompileError::InvalidIdentifier { .. }));
    assert_eq!(
        err.location().map(|l| l.to_string()).as_deref(),
        Some("apps[0].nodes[0].classname")
    );
}

#[test]
fn test_invalid_version_string() {
    let doc = minimal_with(|doc| doc["wolfes_version"] = json!("v0.7"));
    let mut diags = Diagnostics::new();
    let err = IrBuilder::new(&mut diags).build(&doc).unwrap_err();
    assert!(matches!(err, CompileError::InvalidVersion(_)));
    assert_eq!(err.code(), ErrorCode::InvalidVersion);
}

#[test]
fn test_unknown_lang_code() {
    let doc = minimal_with(|doc| doc["lang"] = json!(7));
    let mut diags = Diagnostics::new();
    let err = IrBuilder::new(&mut diags).build(&doc).unwrap_err();
    assert_eq!(err.code(), ErrorCode::InvalidArgument);
}

#[test]
fn test_missing_input_file() {
    let (result, _) = compile_fixture("does_not_exist.jsonc");
    assert_eq!(result.unwrap_err().code(), ErrorCode::FileNotFound);
}

#[test]
fn test_missing_referenced_file_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let text = std::fs::read_to_string(fixture("full.jsonc")).unwrap();
    let path = dir.path().join("full.jsonc");
    std::fs::write(&path, text).unwrap();

    // qos/ and msgs/ are not next to the copied document
    let mut diags = Diagnostics::new();
    let err = Compiler::new()
        .compile_file(path.to_str().unwrap(), &mut diags)
        .unwrap_err();
    match err {
        CompileError::ReferencedFileNotFound { location, .. } => {
            assert_eq!(location.to_string(), "apps[0].scheduler_config");
        }
        other => panic!("Expected ReferencedFileNotFound, got {:?}", other),
    }
}
