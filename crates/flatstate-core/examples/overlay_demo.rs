//! Diff Overlay Demonstration
//!
//! Reads a resource's flat state, then the same fields as they will look
//! once a planned change-set is applied.
#![allow(clippy::unwrap_used, clippy::expect_used)]
//!
//! Key concepts illustrated:
//! 1. Decoding flat state under a schema
//! 2. Overlaying a diff without touching state
//! 3. Computed values
//! 4. Stacking state and plan as named levels

use flatstate_core::logging_facility::{init, Profile};
use flatstate_core::{
    address, hash_value_identity, BasicMapReader, DiffFieldReader, FieldReader, InstanceDiff,
    MapFieldReader, MultiLevelFieldReader, ResourceAttrDiff, Schema, SchemaMap,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init(Profile::Development);
    println!("=== Flatstate Overlay Demo ===\n");

    let mut schema = SchemaMap::new();
    schema.insert("instance_type".to_string(), Schema::string());
    schema.insert("tags".to_string(), Schema::map(Schema::string()));
    schema.insert(
        "ingress".to_string(),
        Schema::set(
            Schema::object([("port", Schema::int()), ("cidr", Schema::string())]),
            hash_value_identity(),
        ),
    );
    schema.insert("public_ip".to_string(), Schema::string());

    // ===== Part 1: Stored state =====
    println!("## Part 1: Stored state\n");
    let state = MapFieldReader::new(
        &schema,
        BasicMapReader::from_iter([
            ("instance_type", "t3.small"),
            ("tags.#", "2"),
            ("tags.env", "staging"),
            ("tags.team", "web"),
            ("public_ip", "203.0.113.7"),
        ]),
    );
    for field in ["instance_type", "tags", "public_ip"] {
        let out = state.read_field(&address(&[field]))?;
        println!("  {:<14} {:?}", field, out.value);
    }

    // ===== Part 2: Planned change =====
    println!("\n## Part 2: Planned change\n");
    let plan = InstanceDiff::new()
        .attr(
            "instance_type",
            ResourceAttrDiff::change("t3.small", "t3.large").with_requires_new(),
        )
        .attr("tags.env", ResourceAttrDiff::change("staging", "prod"))
        .attr("tags.team", ResourceAttrDiff::removed())
        .attr("public_ip", ResourceAttrDiff::computed("203.0.113.7"));
    let planned = DiffFieldReader::new(&schema, &plan, &state);

    for field in ["instance_type", "tags", "public_ip", "ingress"] {
        let out = planned.read_field(&address(&[field]))?;
        println!(
            "  {:<14} exists={:<5} computed={:<5} {:?}",
            field, out.exists, out.computed, out.value
        );
    }
    println!("  requires replacement: {}", plan.requires_new());

    // ===== Part 3: Levels =====
    println!("\n## Part 3: Levels\n");
    let mut levels = MultiLevelFieldReader::new(&schema, ["state", "diff"]);
    levels.set_level("state", &state)?;
    levels.set_level("diff", &planned)?;
    for level in ["state", "diff"] {
        let out = levels.read_field_merge(&address(&["instance_type"]), level)?;
        println!("  {:<6} instance_type = {:?}", level, out.value);
    }

    println!("\n=== Demo Complete ===");
    Ok(())
}
