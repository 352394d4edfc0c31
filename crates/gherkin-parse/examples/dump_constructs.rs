use std::io::Read;

use gherkin_parse::{KeywordTables, Lexer, Parser};

fn main() {
    let mut source = String::new();
    std::io::stdin().read_to_string(&mut source).unwrap();
    let language = std::env::args().nth(1).unwrap_or_else(|| "en".to_string());

    let tables = KeywordTables::builtin();

    println!("=== Events ===");
    for event in Lexer::for_language(&source, tables, &language, 0).unwrap() {
        println!("{:?}", event);
    }

    println!("\n=== Constructs ===");
    let lexer = Lexer::for_language(&source, tables, &language, 0).unwrap();
    let mut constructs = Vec::new();
    let result = Parser::new(lexer).parse(&mut constructs);
    for construct in &constructs {
        println!("{:?}", construct);
    }
    if let Err(e) = result {
        eprint!("{}", e.render("<stdin>", &source, 0));
    }
}
