//! Human-readable report of a decoded program.
//!
//! One section per structure, in image order: header, type table, const pool,
//! function table, bytecode. Sections are separated by a blank line.

use std::fmt::Write as _;

use harpy_core::Colors;
use harpy_core::utils::{hex_bytes, printable_ascii};

use super::program::Program;
use super::type_table::TypeEntry;

/// Render `program` as text.
pub fn dump(program: &Program, colors: Colors) -> String {
    let mut out = String::new();

    dump_header(&mut out, program, &colors);
    out.push('\n');
    dump_types(&mut out, program, &colors);
    out.push('\n');
    dump_constants(&mut out, program, &colors);
    out.push('\n');
    dump_functions(&mut out, program, &colors);
    out.push('\n');
    dump_bytecode(&mut out, program, &colors);

    out
}

fn banner(out: &mut String, title: &str, c: &Colors) {
    writeln!(out, "{}=== {title} ==={}", c.blue, c.reset).unwrap();
}

fn dump_header(out: &mut String, program: &Program, c: &Colors) {
    let h = &program.header;

    banner(out, "HEADER", c);
    writeln!(
        out,
        "Magic: {} ({})",
        hex_bytes(&h.magic),
        printable_ascii(&h.magic)
    )
    .unwrap();
    writeln!(out, "Version: 0x{:04x}", h.version).unwrap();
    writeln!(out, "Flags: 0x{:04x}", h.flags).unwrap();
    writeln!(out, "Entry point: 0x{:04x}", h.entry_point).unwrap();
    writeln!(out, "Type table offset: {}", h.type_table_offset).unwrap();
    writeln!(out, "Const pool offset: {}", h.const_pool_offset).unwrap();
    writeln!(out, "Function table offset: {}", h.function_table_offset).unwrap();
    writeln!(out, "Bytecode offset: {}", h.bytecode_offset).unwrap();
    writeln!(out, "Bytecode size: {}", h.bytecode_size).unwrap();
}

fn dump_types(out: &mut String, program: &Program, c: &Colors) {
    banner(out, "TYPE TABLE", c);
    for (i, ty) in program.types.iter().enumerate() {
        write!(
            out,
            "Type {i}: {}{}{}, Size: {} bytes",
            c.green,
            ty.kind_name(),
            c.reset,
            ty.width()
        )
        .unwrap();
        match ty {
            TypeEntry::Primitive { primitive, .. } => {
                write!(out, ", Primitive: {primitive}").unwrap();
            }
            TypeEntry::Boxed { points_to } | TypeEntry::Reference { points_to } => {
                write!(out, ", Points to: {points_to}").unwrap();
            }
            TypeEntry::Void | TypeEntry::Custom { .. } => {}
        }
        out.push('\n');
    }
}

fn dump_constants(out: &mut String, program: &Program, c: &Colors) {
    banner(out, "CONST POOL", c);
    for (i, entry) in program.constants.iter().enumerate() {
        writeln!(
            out,
            "Const {i}: Type {}, Value: {}",
            entry.type_id, entry.value
        )
        .unwrap();
    }
}

fn dump_functions(out: &mut String, program: &Program, c: &Colors) {
    banner(out, "FUNCTION TABLE", c);
    for (i, func) in program.functions.iter().enumerate() {
        writeln!(out, "Function {i}:").unwrap();
        writeln!(out, "    Code offset: 0x{:04x}", func.code_offset).unwrap();
        writeln!(out, "    Param count: {}", func.param_count).unwrap();
        writeln!(out, "    Local count: {}", func.local_count).unwrap();
        if !func.locals.is_empty() {
            let locals: Vec<String> = func.locals.iter().map(|t| t.to_string()).collect();
            writeln!(out, "    Local types: [{}]", locals.join(", ")).unwrap();
        }
    }
}

fn dump_bytecode(out: &mut String, program: &Program, c: &Colors) {
    banner(out, "BYTECODE", c);
    for instr in &program.instructions {
        write!(
            out,
            "{}[0x{:04x}]{} {}{}{}",
            c.dim,
            instr.offset,
            c.reset,
            c.green,
            instr.mnemonic(),
            c.reset
        )
        .unwrap();
        if let Some(operand) = instr.operand {
            write!(out, " {operand}").unwrap();
        }
        out.push('\n');
    }
}
