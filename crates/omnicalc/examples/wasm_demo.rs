//! Browser Layer Demo
//!
//! Drives the calculator through the mock DOM the way the browser bindings
//! do, then runs the shared driver checks against it.
//!
//! Run with: cargo run --example wasm_demo

use omnicalc::driver::{run_all_checks, CalculatorDriver};
use omnicalc::wasm::{ids, WasmDriver};

fn main() {
    println!("OmniCalc browser layer demo (mock DOM)");
    println!("======================================");

    let mut driver = WasmDriver::new();

    println!("\n1. Click 1 2 0 0 ×");
    for id in ["btn-1", "btn-2", "btn-0", "btn-0", "btn-times"] {
        driver.click(id);
    }
    println!("   expression: {:?}", driver.expression_text());
    println!("   display:    {:?}", driver.display_text());

    println!("\n2. Type 3 and press Enter");
    driver.press_key("3");
    driver.press_key("Enter");
    println!("   display:    {:?}", driver.display_text());

    println!("\n3. Divide by zero, then recover");
    for key in ["7", "/", "0", "="] {
        driver.press_key(key);
    }
    println!("   display:    {:?}", driver.display_text());
    driver.press_key("4");
    println!("   next digit: {:?}", driver.display_text());

    println!("\n4. History panel");
    driver.click(ids::HISTORY_BUTTON);
    for (i, row) in driver.history_list_items().iter().enumerate() {
        println!("   [{i}] {row}");
    }

    println!("\n5. DOM events so far: {}", driver.dom().event_history().len());

    println!("\n6. All clear");
    driver.clear();
    println!("   display:    {:?}", driver.display_text());

    println!("\n7. Shared driver checks");
    run_all_checks(&mut WasmDriver::new());
    println!("   all checks passed");
}
