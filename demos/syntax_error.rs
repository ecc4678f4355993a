//! Show how the grammar-driven Kotlin scanner stops at a syntax error
//! while the hand-written one keeps going.

use tagscan::{KotlinStrategy, Language, ScanOptions, TagSink};

fn main() {
    let input = "\
class Kept {
    fun ok() {}
}

fun broken(x: Int = listOf(1, 2]) {}

class Lost
";

    let mut sink = TagSink::new();
    let options = ScanOptions::new()
        .kotlin_strategy(KotlinStrategy::Grammar)
        .file_name("Broken.kt");
    match tagscan::scan(Language::Kotlin, input.as_bytes(), &options, &mut sink) {
        Ok(()) => println!("Parsed OK (unexpected)"),
        Err(e) => {
            println!("Syntax error: {e}");
            println!("  Kind: {:?}", e.kind);
            println!("  Location: line {}, offset {}", e.line, e.offset);
        }
    }
    println!("Tags kept:");
    for tag in &sink {
        println!("  {} (line {})", tag.name, tag.line);
    }

    println!();

    let tags = tagscan::scan_str(Language::Kotlin, input, &ScanOptions::new())
        .expect("the hand-written scanner never fails");
    println!("Hand-written scanner:");
    for tag in &tags {
        println!("  {} (line {})", tag.name, tag.line);
    }
}
