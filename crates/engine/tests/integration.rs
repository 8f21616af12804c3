//! End-to-end engine tests: parse → review actions → export.

use serde_json::{json, Value};

use fieldloom_engine::{extract, reconcile, Confidence, FieldId, ReviewSession};

/// A document in the shape the extraction agents emit: field objects with
/// structured confidence, competing alternatives, and working metadata.
fn study_doc() -> Value {
    json!({
        "metadata": {
            "title": {
                "value": "Optimization of Ethanol Production from Corn Stover",
                "confidence": "High",
                "alternatives": [
                    {
                        "source": "E1",
                        "value": "Optimization of Ethanol Production from Corn Stover",
                        "source_details": {
                            "location": "Page 1, Title block",
                            "type": "text",
                            "snippet": "Optimization of Ethanol Production from Corn Stover"
                        }
                    }
                ]
            },
            "authors": {
                "value": ["Y. Zhang", "T. Smith"],
                "confidence": {"level": "medium"},
                "alternatives": [
                    {
                        "source": "E2",
                        "value": ["Y. Zhang", "T. Smith", "M. Doe"],
                        "source_details": {
                            "location": "Page 1",
                            "snippet": "Authors: Y. Zhang, T. Smith, and M. Doe"
                        }
                    }
                ]
            }
        },
        "units": [
            {
                "id": "SFR-101",
                "volume": {
                    "value": "500 L",
                    "confidence": {
                        "level": "Low",
                        "source_details": {
                            "location": "Page 4, Table 2",
                            "type": "table",
                            "snippet": "Total Volume: 500 L"
                        }
                    },
                    "alternatives": [
                        {
                            "source": "E1",
                            "value": "500 L",
                            "source_details": {"location": "Page 4", "snippet": "500 L bioreactor"}
                        },
                        {
                            "source": "E3",
                            "value": "600 L",
                            "source_details": {"location": "Page 4, Table 2", "snippet": "600 L"}
                        }
                    ]
                },
                "temperature": {"value": "32C", "confidence": "HIGH"}
            }
        ],
        "streams": [
            {
                "id": "S-04",
                "flow_rate": {
                    "value": "12.5 kg/h",
                    "confidence": "Low",
                    "alternatives": [
                        {"source": "E1", "value": "12.5 kg/h"},
                        {"source": "E4", "value": "12.5 L/h"}
                    ]
                }
            }
        ],
        "utilities": {
            "steam": [
                {"id": "HP-Steam", "pressure": {"value": "10 bar", "confidence": "Medium"}}
            ]
        }
    })
}

fn field_id(session: &ReviewSession, path: &str) -> FieldId {
    session
        .fields()
        .iter()
        .find(|f| f.path == path)
        .unwrap_or_else(|| panic!("no field at {path}"))
        .id
}

#[test]
fn round_trip_identity() {
    // No working metadata in the input, fully resolved, clean export:
    // output equals input structurally.
    let original = json!({
        "metadata": {"title": {"value": "T", "confidence": "High"}},
        "units": [{"id": "U-1", "volume": {"value": "500 L", "confidence": "Low"}}]
    });
    let mut session = ReviewSession::new(original.clone(), "t.json").unwrap();
    let ids: Vec<FieldId> = session.fields().iter().map(|f| f.id).collect();
    for id in ids {
        let value = session.field(id).unwrap().value.clone();
        session.set_value(id, value, true);
    }
    assert_eq!(session.export(true), original);
}

#[test]
fn untouched_export_preserves_everything() {
    // No edits, no deletions, clean mode off: the export is the original,
    // alternatives and all.
    let original = study_doc();
    let session = ReviewSession::new(original.clone(), "study.json").unwrap();
    assert_eq!(session.export(false), original);
}

#[test]
fn export_is_deterministic() {
    let original = study_doc();
    let mut session = ReviewSession::new(original, "study.json").unwrap();
    let flow = field_id(&session, "streams[0].flow_rate");
    session.set_value(flow, json!("12.5 L/h"), true);
    session.set_comment(flow, "basis confirmed as liquid");

    let first = serde_json::to_string_pretty(&session.export(false)).unwrap();
    let second = serde_json::to_string_pretty(&session.export(false)).unwrap();
    assert_eq!(first, second);
}

#[test]
fn deletion_propagates_to_export() {
    let original = study_doc();
    let mut session = ReviewSession::new(original, "study.json").unwrap();

    // Delete one of two fields on SFR-101: member gone, element kept.
    session.delete_field(field_id(&session, "units[0].volume"));
    let output = session.export(false);
    assert!(output["units"][0].get("volume").is_none());
    assert_eq!(output["units"][0]["id"], json!("SFR-101"));

    // Delete the remaining field too: the element disappears.
    session.delete_field(field_id(&session, "units[0].temperature"));
    let output = session.export(false);
    assert_eq!(output["units"].as_array().unwrap().len(), 0);
}

#[test]
fn delete_section_drops_container_element() {
    let original = study_doc();
    let mut session = ReviewSession::new(original, "study.json").unwrap();
    session.delete_section("Utility: HP-Steam");
    let output = session.export(false);
    assert_eq!(output["utilities"]["steam"].as_array().unwrap().len(), 0);
    // Other sections untouched.
    assert_eq!(output["streams"].as_array().unwrap().len(), 1);
}

#[test]
fn write_then_export() {
    let original = study_doc();
    let mut session = ReviewSession::new(original, "study.json").unwrap();
    let flow = field_id(&session, "streams[0].flow_rate");
    session.set_value(flow, json!("12.5 L/h"), true);

    let output = session.export(false);
    assert_eq!(output["streams"][0]["flow_rate"]["value"], json!("12.5 L/h"));
    assert_eq!(output["streams"][0]["flow_rate"]["reviewed"], json!(true));
    // Alternatives survive a non-clean export.
    assert!(output["streams"][0]["flow_rate"].get("alternatives").is_some());

    let clean = session.export(true);
    assert_eq!(clean["streams"][0]["flow_rate"]["value"], json!("12.5 L/h"));
    assert!(clean["streams"][0]["flow_rate"].get("reviewed").is_none());
    assert!(no_member_named(&clean, "alternatives"));
    assert!(no_member_named(&clean, "reviewed"));
    assert!(no_member_named(&clean, "comment"));
}

#[test]
fn choose_alternative_then_export() {
    let original = study_doc();
    let mut session = ReviewSession::new(original, "study.json").unwrap();
    let volume = field_id(&session, "units[0].volume");
    session.choose_alternative(volume, 1);

    assert!(session.field(volume).unwrap().resolved);
    let output = session.export(false);
    assert_eq!(output["units"][0]["volume"]["value"], json!("600 L"));
}

#[test]
fn comment_survives_export_without_resolution() {
    let original = study_doc();
    let mut session = ReviewSession::new(original, "study.json").unwrap();
    let authors = field_id(&session, "metadata.authors");
    session.set_comment(authors, "third author only in E2");

    let output = session.export(false);
    assert_eq!(
        output["metadata"]["authors"]["comment"],
        json!("third author only in E2")
    );
    // Unresolved: original value retained.
    assert_eq!(
        output["metadata"]["authors"]["value"],
        json!(["Y. Zhang", "T. Smith"])
    );
}

#[test]
fn confidence_tiers_normalized_across_document() {
    let session = ReviewSession::new(study_doc(), "study.json").unwrap();
    let conf = |path: &str| {
        session
            .fields()
            .iter()
            .find(|f| f.path == path)
            .unwrap()
            .confidence
    };
    assert_eq!(conf("metadata.title"), Confidence::High);
    assert_eq!(conf("metadata.authors"), Confidence::Medium);
    assert_eq!(conf("units[0].volume"), Confidence::Low);
    assert_eq!(conf("units[0].temperature"), Confidence::High);
    assert_eq!(conf("utilities.steam[0].pressure"), Confidence::Medium);
}

#[test]
fn array_rooted_document_round_trip() {
    let original = json!([{
        "metadata": {"title": {"value": "T", "confidence": "High"}},
        "units": [
            {"id": "U-1", "volume": {"value": "1 L", "confidence": "Low"}},
            {"id": "U-2", "volume": {"value": "2 L", "confidence": "Low"}}
        ]
    }]);
    let mut session = ReviewSession::new(original.clone(), "wrapped.json").unwrap();
    assert!(session.fields().iter().all(|f| f.path.starts_with("[0].")));

    // Untouched export is the original, wrapper included.
    assert_eq!(session.export(false), original);

    // Deleting U-1's only field drops the element inside the wrapper and a
    // resolved edit on U-2 still lands.
    session.delete_field(field_id(&session, "[0].units[0].volume"));
    let volume = field_id(&session, "[0].units[1].volume");
    session.set_value(volume, json!("2.5 L"), true);
    let output = session.export(false);
    let units = output[0]["units"].as_array().unwrap();
    assert_eq!(units.len(), 1);
    assert_eq!(units[0]["id"], json!("U-2"));
    assert_eq!(units[0]["volume"]["value"], json!("2.5 L"));
}

#[test]
fn baseline_comparison_ignores_identifiers() {
    // Identifiers are traversal-order synthetics; reconciliation keys on
    // addresses, so a re-extracted baseline with different ids must not
    // produce spurious deletions.
    let original = study_doc();
    let fields = extract(&original);
    let shifted: Vec<_> = fields.into_iter().rev().collect();
    let output = reconcile(&original, &shifted, false);
    assert_eq!(output, original);
}

fn no_member_named(node: &Value, name: &str) -> bool {
    match node {
        Value::Array(items) => items.iter().all(|item| no_member_named(item, name)),
        Value::Object(map) => {
            !map.contains_key(name) && map.values().all(|child| no_member_named(child, name))
        }
        _ => true,
    }
}
