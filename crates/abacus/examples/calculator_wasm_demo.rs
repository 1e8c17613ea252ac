//! WASM Calculator Demo
//!
//! Drives the browser page logic against the mock DOM, then runs the same
//! scenarios the terminal driver passes.
//!
//! Run with: cargo run --example calculator_wasm_demo

use abacus::core::token::Token;
use abacus::driver::{
    run_all_scenarios, verify_addition_scenario, verify_basic_arithmetic, verify_chaining,
    verify_division_by_zero, verify_editing, verify_history, CalculatorDriver,
};
use abacus::wasm::{button_id, WasmDriver, CLEAR_HISTORY_ID};

fn main() {
    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║              abacus - Mock DOM Calculator Demo               ║");
    println!("╚══════════════════════════════════════════════════════════════╝");
    println!();

    let mut driver = WasmDriver::new();

    println!("📦 Mock DOM Structure:");
    println!("   ├── display          (input, value = display text)");
    println!("   ├── buttons          (one button per keypad key)");
    println!("   ├── historyList      (li per entry, newest first)");
    println!("   └── clearHistoryBtn  (clear history button)");
    println!();

    println!("1️⃣  Clicking 1 2 * 3 =");
    for label in ["1", "2", "*", "3", "="] {
        let token: Token = label.parse().unwrap_or(Token::Clear);
        let id = button_id(token);
        driver.click(&id);
        println!("   click #{id:<14} display = {:?}", driver.display());
    }

    println!("\n2️⃣  Typing 2 / 3 Enter on the keyboard");
    for key in ["2", "/", "3", "Enter"] {
        driver.key_press(key);
    }
    println!("   display = {:?}", driver.display());

    println!("\n3️⃣  History list (from DOM):");
    for (row, item) in driver.history().iter().enumerate() {
        println!("   [{row}] {item}");
    }

    println!("\n4️⃣  DOM event history:");
    for (i, event) in driver.dom().event_history().iter().enumerate() {
        println!("   [{i}] {event:?}");
    }

    println!("\n5️⃣  Clicking #{CLEAR_HISTORY_ID}");
    driver.click(CLEAR_HISTORY_ID);
    println!("   history items: {}", driver.history().len());

    println!();
    println!("═══════════════════════════════════════════════════════════════");
    println!("  Running the shared scenarios (same as the terminal driver)");
    println!("═══════════════════════════════════════════════════════════════");
    println!();

    let mut driver = WasmDriver::new();

    print!("  ✓ verify_basic_arithmetic ... ");
    verify_basic_arithmetic(&mut driver);
    println!("PASSED");

    print!("  ✓ verify_addition_scenario ... ");
    verify_addition_scenario(&mut driver);
    println!("PASSED");

    print!("  ✓ verify_division_by_zero ... ");
    verify_division_by_zero(&mut driver);
    println!("PASSED");

    print!("  ✓ verify_chaining ... ");
    verify_chaining(&mut driver);
    println!("PASSED");

    print!("  ✓ verify_editing ... ");
    verify_editing(&mut driver);
    println!("PASSED");

    print!("  ✓ verify_history ... ");
    verify_history(&mut driver);
    println!("PASSED");

    let mut driver = WasmDriver::new();
    print!("  Running run_all_scenarios() ... ");
    run_all_scenarios(&mut driver);
    println!("PASSED");
}
