//! # py2cpp
//!
//! This binary is the transpiler front end. It combines lexer, parser,
//! translator, and emitter into a single application that reads a Python
//! source file and prints the seeded C++ port to standard output.

mod cli;

use cli::*;

use std::{error::Error, fs, rc::Rc};

use log::info;

use py2cpp::{convert::Converter, cpp::BuildContext, lexer::Lexer, parser, qt, types::TypeRegistry};

fn main() -> Result<(), Box<dyn Error>> {
    let args = Cli::init();

    simple_logger::init_with_level((&args.verbosity).into()).unwrap();

    let source = fs::read_to_string(&args.input)?;

    let mut registry = TypeRegistry::with_builtins();
    if args.using_qt {
        qt::register_qt_types(&mut registry);
    }
    let registry = Rc::new(registry);

    let tokens = Lexer::new(&source).lex()?;
    let module = parser::parse(tokens)?;

    if args.dump_parsed {
        info!("Parsed AST:\n{module:#?}");
    }

    let mut converter = Converter::new(Rc::clone(&registry));
    let module = converter.convert_module(module)?;

    let ctx = BuildContext::new(&registry);
    println!("// generate by py2cpp");
    println!("// original source code: {}", args.input.display());
    println!("#include \"py2cpp/py2cpp.hpp\"\n");
    println!("{}", module.build(&ctx));

    Ok(())
}
