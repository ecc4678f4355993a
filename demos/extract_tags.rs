//! Extract tags from a Go file and a Kotlin file, then print them in
//! tag-file order.

use tagscan::{KotlinStrategy, Language, ScanOptions};

fn main() {
    let go = "\
package inventory

type Item struct {
\tName  string
\tCount int
}

func (i *Item) Restock(n int) { i.Count += n }
";

    let options = ScanOptions::new().qualified_tags(true);
    let tags = tagscan::scan_str(Language::Go, go, &options).expect("Go never fails");
    println!("Go:");
    for tag in &tags {
        println!("  {:<20} {} line {}", tag.name, tag.letter(), tag.line);
    }

    let kotlin = "\
package inventory

data class Item(val name: String, var count: Int) {
    fun restock(n: Int) { count += n }

    companion object {
        const val MAX = 99
    }
}
";

    for strategy in [KotlinStrategy::HandWritten, KotlinStrategy::Grammar] {
        let options = ScanOptions::new().kotlin_strategy(strategy);
        let tags = tagscan::scan_str(Language::Kotlin, kotlin, &options).expect("valid Kotlin");
        println!("\nKotlin ({strategy:?}):");
        for tag in &tags {
            let name = tag.qualified_name.as_deref().unwrap_or(&tag.name);
            println!("  {:<20} {} line {}", name, tag.letter(), tag.line);
        }
    }
}
