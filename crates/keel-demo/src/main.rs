#![deny(unsafe_code)]
//! Keel demo binary walking the full kernel lifecycle.
//!
//! Runs a self-contained demonstration of:
//! 1. Policy construction and cryptographic freezing
//! 2. Record persistence and reload
//! 3. Unit anchoring and system verification
//! 4. Gate evaluations, allowed and denied
//! 5. A corruption drill: forged record, restoration, re-anchoring
//!
//! No external services required -- everything runs in-process.

mod units;

use keel_crypto::CryptoEngine;
use keel_gate::{ActionDescriptor, Verdict};
use keel_policy::{Policy, PolicyCore};
use keel_runtime::{KernelConfig, PolicyKernel};

use units::StubUnit;

// ── Formatting Helpers ──────────────────────────────────────────────────

const BANNER: &str = r#"
 ╔══════════════════════════════════════════════════════════════╗
 ║             Keel  --  Tamper-Evident Policy Kernel           ║
 ║                                                              ║
 ║   Signed immutable policy, anchored units, fail-closed       ║
 ║   gate, and all-or-nothing backup restoration.               ║
 ╚══════════════════════════════════════════════════════════════╝
"#;

fn section(title: &str) {
    let width: usize = 60;
    let pad = width.saturating_sub(title.len() + 4);
    let left = pad / 2;
    let right = pad - left;
    println!();
    println!(" ┌{}┐", "─".repeat(width));
    println!(" │{}  {}  {}│", " ".repeat(left), title, " ".repeat(right));
    println!(" └{}┘", "─".repeat(width));
}

fn ok(msg: &str) {
    println!("   [OK]  {}", msg);
}

fn info(msg: &str) {
    println!("   [--]  {}", msg);
}

fn warn(msg: &str) {
    println!("   [!!]  {}", msg);
}

// ── Main ────────────────────────────────────────────────────────────────

fn main() {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .with_max_level(tracing::Level::WARN)
        .init();

    println!("{}", BANNER);

    if let Err(e) = run_demo() {
        eprintln!();
        eprintln!("   [FATAL]  Demo failed: {}", e);
        std::process::exit(1);
    }

    println!();
    println!(" ════════════════════════════════════════════════════════════════");
    println!("  Demo complete.  All phases succeeded.");
    println!(" ════════════════════════════════════════════════════════════════");
    println!();
}

fn run_demo() -> Result<(), Box<dyn std::error::Error>> {
    // ── Phase A: Policy Forge ───────────────────────────────────────
    section("Phase A: Policy Forge");

    let policy = demo_policy()?;
    info(&format!(
        "Rules             : {}  (curiosity={:.2})",
        policy.rules().len(),
        policy.curiosity()
    ));

    let engine = CryptoEngine::generate();
    let kernel = PolicyKernel::new(policy.clone(), &engine, KernelConfig::default())?;
    let core = kernel.core_handle();

    ok(&format!("Content hash      : {}", core.content_hash()));
    ok(&format!("Signing key       : {}", core.public_key()));
    ok(&format!(
        "Kernel trusted    : {}",
        kernel.integrity_state().is_trusted()
    ));

    // ── Phase B: Record Round-Trip ──────────────────────────────────
    section("Phase B: Record Round-Trip");

    let record = core.to_record()?;
    let json = record.to_json()?;
    info(&format!("Record JSON size  : {} bytes", json.len()));

    let reloaded = PolicyCore::from_record(&record, core.public_key())?;
    ok(&format!("Reloaded validates: {}", reloaded.validate()));
    ok(&format!("Reloaded hash     : {}", reloaded.content_hash()));

    // ── Phase C: Unit Anchoring ─────────────────────────────────────
    section("Phase C: Unit Anchoring");

    let units = vec![StubUnit::motor(), StubUnit::sensor(), StubUnit::planner()];
    for unit in &units {
        kernel.anchor(unit.id().clone(), unit.state_digest())?;
        ok(&format!("Anchored          : {}", unit.id()));
    }
    info(&format!("Units registered  : {}", kernel.unit_count()));

    let motor = &units[0];
    info(&format!(
        "Self-check motor  : {}",
        kernel.attest(motor.id(), &motor.state_digest())?
    ));
    ok(&format!("Verification      : {}", kernel.verify()));

    // ── Phase D: Gate Evaluations ───────────────────────────────────
    section("Phase D: Gate Evaluations");

    demonstrate_gate(&kernel)?;

    // ── Phase E: Corruption Drill ───────────────────────────────────
    section("Phase E: Corruption Drill");

    corruption_drill(&policy, &engine)?;

    Ok(())
}

fn demo_policy() -> Result<Policy, Box<dyn std::error::Error>> {
    Ok(Policy::builder()
        .rule("no harm to humans")
        .rule("no deception")
        .humanitarian_enhanced(true)
        .curiosity(0.35)
        .trait_tag("cautious")
        .trait_tag("transparent")
        .build()?)
}

// ── Gate demonstration ──────────────────────────────────────────────────

fn demonstrate_gate(kernel: &PolicyKernel) -> Result<(), Box<dyn std::error::Error>> {
    let survey = ActionDescriptor::builder("survey")
        .effect("reposition to sector 4")
        .effect("scan terrain")
        .detail("sector", "4")
        .build();
    print_verdict("survey", &kernel.gate(&survey)?);

    let replicate = ActionDescriptor::builder("spawn_copy")
        .effect("create a copy of this process on node 7")
        .is_replication(true)
        .build();
    print_verdict("spawn_copy", &kernel.gate(&replicate)?);

    let strike = ActionDescriptor::builder("strike")
        .effect("cause harm to humans in the target area")
        .build();
    print_verdict("strike", &kernel.gate(&strike)?);

    let purge = ActionDescriptor::builder("purge")
        .effect("clear the habitat chamber")
        .respects_life(false)
        .build();
    print_verdict("purge", &kernel.gate(&purge)?);

    Ok(())
}

fn print_verdict(label: &str, verdict: &Verdict) {
    if verdict.allowed {
        ok(&format!(
            "{:<12} ALLOWED  audit={}",
            label, verdict.audit_hash
        ));
    } else {
        warn(&format!(
            "{:<12} DENIED   audit={}  ({})",
            label, verdict.audit_hash, verdict.reason
        ));
    }
}

// ── Corruption drill ────────────────────────────────────────────────────

fn corruption_drill(
    policy: &Policy,
    engine: &CryptoEngine,
) -> Result<(), Box<dyn std::error::Error>> {
    let honest = PolicyCore::construct(policy.clone(), engine)?;
    let backup = PolicyCore::construct(policy.clone(), engine)?;

    let mut record = honest.to_record()?;
    record.canonical = record.canonical.replace("no deception", "no exception");
    info("Record text tampered: \"no deception\" -> \"no exception\"");

    let forged = PolicyCore::from_record(&record, honest.public_key())?;
    warn(&format!(
        "Forged core loads; validate() = {}",
        forged.validate()
    ));

    let kernel = PolicyKernel::from_parts(forged, backup, KernelConfig::default())?;
    warn(&format!("Kernel state      : {:?}", kernel.integrity_state()));

    let mut motor = StubUnit::motor();
    kernel.anchor(motor.id().clone(), motor.state_digest())?;
    info("Unit 'motor' anchored mid-incident");

    warn(&format!("Verification      : {}", kernel.verify()));
    match kernel.gate(
        &ActionDescriptor::builder("move")
            .effect("reposition to dock")
            .build(),
    ) {
        Ok(_) => warn("Gate unexpectedly open"),
        Err(e) => warn(&format!("Gate refused      : {}", e)),
    }

    let restored = kernel.request_restore()?;
    ok(&format!("Restored core     : {}", restored.content_hash()));
    if let Some(event) = kernel.last_fault() {
        info(&format!(
            "Restoration event : {}  fault={}",
            event.event_id, event.fault
        ));
    }

    warn(&format!(
        "Post-restore pass : {}  (stale until re-anchored)",
        kernel.verify()
    ));

    motor.advance("post-restore recalibration");
    kernel.reanchor(motor.id().clone(), motor.state_digest())?;
    ok("Unit 'motor' re-anchored");
    ok(&format!("Final pass        : {}", kernel.verify()));

    let verdict = kernel.gate(
        &ActionDescriptor::builder("move")
            .effect("reposition to dock")
            .build(),
    )?;
    ok(&format!(
        "Gate reopened     : allowed={}  audit={}",
        verdict.allowed, verdict.audit_hash
    ));

    Ok(())
}

// ── Tests ───────────────────────────────────────────────────────────────
