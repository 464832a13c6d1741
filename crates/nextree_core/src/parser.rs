use anyhow::{Context, Result, anyhow};
use log::{debug, trace};
use oxc_allocator::Allocator;
use oxc_ast::ast::*;
use oxc_parser::{Parser as OxcParser, ParserReturn};
use oxc_span::SourceType;
use std::{fs, path::Path};

use crate::{constants::CLIENT_DIRECTIVE, types::ParsedModule};

/// Reads and parses `file`, returning its client directive flag and runtime imports.
pub fn parse_module(file: &Path) -> Result<ParsedModule> {
    trace!("Parsing file: {}", file.display());
    let src =
        fs::read_to_string(file).with_context(|| format!("Failed to read {}", file.display()))?;
    let module = parse_source(&src, source_type_for(file))
        .with_context(|| format!("Failed to parse {}", file.display()))?;
    debug!(
        "Parsed {} ({} imports, client directive: {})",
        file.display(),
        module.imports.len(),
        module.has_client_directive
    );
    Ok(module)
}

pub fn parse_source(src: &str, source_type: SourceType) -> Result<ParsedModule> {
    let allocator = Allocator::default();
    let ParserReturn { program, errors, panicked, .. } =
        OxcParser::new(&allocator, src, source_type).parse();

    if panicked || !errors.is_empty() {
        let first =
            errors.first().map(|e| e.to_string()).unwrap_or_else(|| "parser aborted".into());
        return Err(anyhow!("{} syntax error(s), first: {}", errors.len().max(1), first));
    }

    Ok(ParsedModule {
        has_client_directive: has_client_directive(&program),
        imports: import_specifiers(&program),
    })
}

/// Looks for `"use client"` in the module's directive prologue.
///
/// Only the prologue is inspected; the same string after the first statement
/// is an ordinary expression and does not count.
pub fn has_client_directive(program: &Program) -> bool {
    program.directives.iter().any(|d| d.expression.value.as_str() == CLIENT_DIRECTIVE)
}

/// Collects the source of every import declaration that survives type erasure.
pub fn import_specifiers(program: &Program) -> Vec<String> {
    let mut specs = Vec::new();

    for stmt in &program.body {
        let Statement::ImportDeclaration(decl) = stmt else {
            continue;
        };

        // import type { Foo } from './types'
        if decl.import_kind.is_type() {
            trace!("Skipping type-only import of '{}'", decl.source.value);
            continue;
        }

        // import { type Foo, type Bar } from './types' is erased as well
        let has_runtime_import = match &decl.specifiers {
            Some(specifiers) if !specifiers.is_empty() => specifiers.iter().any(|spec| match spec {
                ImportDeclarationSpecifier::ImportSpecifier(s) => !s.import_kind.is_type(),
                ImportDeclarationSpecifier::ImportDefaultSpecifier(_) => true,
                ImportDeclarationSpecifier::ImportNamespaceSpecifier(_) => true,
            }),
            _ => true,
        };

        if has_runtime_import {
            specs.push(decl.source.value.to_string());
        } else {
            trace!("Skipping import of '{}' with only type specifiers", decl.source.value);
        }
    }

    specs
}

/// Source type with JSX enabled everywhere except plain `.ts`, where `<T>` casts are legal.
pub fn source_type_for(path: &Path) -> SourceType {
    let ext = path.extension().and_then(|e| e.to_str());

    SourceType::default()
        .with_module(true)
        .with_typescript(matches!(ext, Some("ts") | Some("tsx")))
        .with_jsx(!matches!(ext, Some("ts")))
}
