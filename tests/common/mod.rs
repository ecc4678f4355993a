#![allow(dead_code)]

use tagscan::{KotlinStrategy, Language, ScanOptions, SyntaxError, Tag, TagSink, scan};

/// Interface and classes with nested generic bounds.
pub const GENERICS_INPUT: &str = "\
interface Foo<T> {
    fun<T: Any> genericFunction1() = 41
    fun<T: Pair<String,Pair<Int, Double>>> genericFunction2() = 42
    fun <T> genericFunction3() = 43
}

class Bar<T, U>(val a: T, val b: U): Foo<T>
class Baz <T, U: Pair<String,Pair<Int, Double>>>(val c: T, val d: U): Foo<T>
";

/// A Kotlin file touching every declaration kind.
pub const SHAPES: &str = r#"package com.example.shapes

import kotlin.math.PI

/** Shapes with an area. */
sealed interface Shape {
    val area: Double
}

data class Circle(val radius: Double) : Shape {
    override val area: Double
        get() = PI * radius * radius
}

object Registry {
    private val shapes = mutableListOf<Shape>()
    fun register(shape: Shape) { shapes += shape }
}

enum class Color { RED, GREEN }

typealias ShapeList = List<Shape>

fun List<Shape>.totalArea(): Double = sumOf { it.area }

const val UNIT = "cm"

fun main() {
    val (first, second) = listOf(1, 2)
    println("total: ${Registry.toString()} $UNIT")
}
"#;

/// Tags from the Go scanner.
pub fn go_tags(input: &str) -> Vec<Tag> {
    go_tags_with(input, &ScanOptions::new())
}

pub fn go_tags_with(input: &str, options: &ScanOptions) -> Vec<Tag> {
    let mut sink = TagSink::new();
    scan(Language::Go, input.as_bytes(), options, &mut sink)
        .unwrap_or_else(|e| panic!("Go scan failed: {e}"));
    sink.into_tags()
}

/// Tags from the hand-written Kotlin scanner.
pub fn kotlin_tags(input: &str) -> Vec<Tag> {
    kotlin_tags_with(input, &ScanOptions::new())
}

pub fn kotlin_tags_with(input: &str, options: &ScanOptions) -> Vec<Tag> {
    let options = options.clone().kotlin_strategy(KotlinStrategy::HandWritten);
    let mut sink = TagSink::new();
    scan(Language::Kotlin, input.as_bytes(), &options, &mut sink)
        .unwrap_or_else(|e| panic!("hand-written Kotlin scan failed: {e}"));
    sink.into_tags()
}

/// Tags from the grammar-driven Kotlin scanner, with its result.
pub fn grammar_tags(input: &str) -> (Vec<Tag>, Result<(), SyntaxError>) {
    grammar_tags_with(input, &ScanOptions::new())
}

pub fn grammar_tags_with(
    input: &str,
    options: &ScanOptions,
) -> (Vec<Tag>, Result<(), SyntaxError>) {
    let options = options.clone().kotlin_strategy(KotlinStrategy::Grammar);
    let mut sink = TagSink::new();
    let result = scan(Language::Kotlin, input.as_bytes(), &options, &mut sink);
    (sink.into_tags(), result)
}

/// `(name, letter, line)` for each tag, in order.
pub fn summary(tags: &[Tag]) -> Vec<(&str, char, usize)> {
    tags.iter()
        .map(|t| (t.name.as_str(), t.letter(), t.line))
        .collect()
}

pub fn names(tags: &[Tag]) -> Vec<&str> {
    tags.iter().map(|t| t.name.as_str()).collect()
}
