use std::io::Write as _;

use super::error::{DecodeError, Section};
use super::instructions::{Instruction, Op, Opcode, Operand};
use super::program::{DecodeOptions, Finding, LoadError, Program};
use super::test_utils::{ImageBuilder, raw_header};
use super::type_table::{PrimitiveKind, TypeEntry, TypeId};

fn minimal_image() -> Vec<u8> {
    let mut bytes = raw_header(33, 34, 34, 34, 1);
    bytes.push(0x00); // Void
    bytes.push(0xFF); // HALT
    bytes
}

fn sample_image() -> Vec<u8> {
    ImageBuilder::new()
        .void()
        .primitive(0x01, 8)
        .boxed(1)
        .constant(1, &7u64.to_be_bytes())
        .function(0, 0, &[1])
        .code(&[0x01, 0, 0, 0, 0, 0x60, 0, 0, 0, 0, 0, 0, 0, 0, 0xFF])
        .build()
}

#[test]
fn minimal_image_decodes() {
    let program = Program::decode(&minimal_image()).unwrap();

    assert_eq!(program.header.type_table_offset, 33);
    assert_eq!(program.header.bytecode_size, 1);
    assert_eq!(program.types.as_slice(), [TypeEntry::Void]);
    assert!(program.constants.is_empty());
    assert!(program.functions.is_empty());
    assert_eq!(
        program.instructions,
        [Instruction {
            offset: 0,
            op: Op::Known(Opcode::Halt),
            operand: None,
        }]
    );
    assert!(program.findings.is_empty());
}

#[test]
fn layout_follows_header() {
    let program = Program::decode(&minimal_image()).unwrap();

    assert_eq!(program.layout.type_table, 33..34);
    assert_eq!(program.layout.const_pool, 34..34);
    assert_eq!(program.layout.function_table, 34..34);
    assert_eq!(program.layout.bytecode, 34..35);
}

#[test]
fn sample_image_decodes() {
    let program = Program::decode(&sample_image()).unwrap();

    assert_eq!(program.types.len(), 3);
    assert_eq!(
        program.types.get(TypeId(1)),
        Some(&TypeEntry::Primitive {
            primitive: PrimitiveKind::Int,
            width: 8
        })
    );

    let c0 = program.constants.get(0).unwrap();
    assert_eq!(c0.type_id, TypeId(1));
    assert_eq!(c0.value.to_u64(), Some(7));

    let f0 = program.functions.get(0).unwrap();
    assert_eq!(f0.locals, [TypeId(1)]);

    let ops: Vec<_> = program
        .instructions
        .iter()
        .map(|i| (i.offset, i.op, i.operand))
        .collect();
    assert_eq!(
        ops,
        [
            (0, Op::Known(Opcode::LoadConst), Some(Operand::Const(0))),
            (5, Op::Known(Opcode::Jmp), Some(Operand::Address(0))),
            (14, Op::Known(Opcode::Halt), None),
        ]
    );
}

#[test]
fn decoding_is_deterministic() {
    let bytes = sample_image();
    assert_eq!(
        Program::decode(&bytes).unwrap(),
        Program::decode(&bytes).unwrap()
    );
}

#[test]
fn magic_is_not_checked_by_default() {
    let bytes = ImageBuilder::new().magic(*b"XXXXX").code(&[0xFF]).build();

    let program = Program::decode(&bytes).unwrap();
    assert_eq!(&program.header.magic, b"XXXXX");
    assert!(!program.header.validate_magic());
}

#[test]
fn strict_rejects_bad_magic() {
    let bytes = ImageBuilder::new().magic(*b"XXXXX").code(&[0xFF]).build();

    let err = Program::decode_with(&bytes, DecodeOptions::strict()).unwrap_err();
    assert_eq!(err, DecodeError::BadMagic { found: *b"XXXXX" });
    assert_eq!(err.section(), Section::Header);
}

#[test]
fn bytecode_offset_mismatch_is_a_finding() {
    let bytes = ImageBuilder::new()
        .void()
        .code(&[0xFF])
        .bytecode_offset(99)
        .build();

    let program = Program::decode(&bytes).unwrap();

    assert_eq!(
        program.findings,
        [Finding::BytecodeOffsetMismatch {
            declared: 99,
            derived: 34
        }]
    );
    assert_eq!(
        program.findings[0].to_string(),
        "header bytecode offset 99 disagrees with stream start 34 (using 34)"
    );
    // Stream is still located from the size.
    assert_eq!(program.instructions.len(), 1);
    assert_eq!(program.instructions[0].op, Op::Known(Opcode::Halt));
}

#[test]
fn strict_rejects_bytecode_offset_mismatch() {
    let bytes = ImageBuilder::new()
        .void()
        .code(&[0xFF])
        .bytecode_offset(99)
        .build();

    let err = Program::decode_with(&bytes, DecodeOptions::strict()).unwrap_err();
    assert_eq!(
        err,
        DecodeError::BytecodeOffsetMismatch {
            declared: 99,
            derived: 34
        }
    );
}

#[test]
fn type_table_gap_is_a_finding() {
    // One unused byte between the header and the type table.
    let mut bytes = raw_header(34, 35, 35, 35, 1);
    bytes.push(0xEE);
    bytes.push(0x00);
    bytes.push(0xFF);

    let program = Program::decode(&bytes).unwrap();

    assert_eq!(program.types.as_slice(), [TypeEntry::Void]);
    assert_eq!(program.findings, [Finding::TypeTableOffset { declared: 34 }]);
}

#[test]
fn strict_rejects_unknown_local_type() {
    let bytes = ImageBuilder::new()
        .void()
        .function(0, 0, &[3])
        .code(&[0xFF])
        .build();

    assert!(Program::decode(&bytes).is_ok());

    let err = Program::decode_with(&bytes, DecodeOptions::strict()).unwrap_err();
    assert!(matches!(
        err,
        DecodeError::UnknownLocalType {
            function: 0,
            local: 0,
            index: 3,
            count: 1,
            ..
        }
    ));
}

#[test]
fn strict_accepts_well_formed_image() {
    let bytes = sample_image();
    assert_eq!(
        Program::decode_with(&bytes, DecodeOptions::strict()).unwrap(),
        Program::decode(&bytes).unwrap()
    );
}

#[test]
fn errors_stop_at_first_failing_section() {
    let bytes = ImageBuilder::new()
        .raw_types(&[0x09])
        .code(&[0x01, 0x00])
        .build();

    let err = Program::decode(&bytes).unwrap_err();
    assert_eq!(err, DecodeError::InvalidTypeTag { tag: 0x09, offset: 33 });
    assert_eq!(err.section(), Section::TypeTable);
}

#[test]
fn const_pool_error_surfaces() {
    let bytes = ImageBuilder::new()
        .void()
        .constant(4, &[])
        .code(&[0xFF])
        .build();

    let err = Program::decode(&bytes).unwrap_err();
    assert_eq!(
        err,
        DecodeError::UnknownTypeIndex {
            index: 4,
            offset: 34,
            count: 1
        }
    );
}

#[test]
fn truncated_instruction_surfaces() {
    let bytes = ImageBuilder::new().code(&[0xFF, 0x70, 0x00]).build();

    let err = Program::decode(&bytes).unwrap_err();
    assert_eq!(
        err,
        DecodeError::TruncatedInstruction {
            offset: 1,
            mnemonic: "CALL",
            size: 5,
            available: 2
        }
    );
    assert_eq!(err.section(), Section::Bytecode);
}

#[test]
fn short_image_is_rejected() {
    let err = Program::decode(&[0u8; 10]).unwrap_err();
    assert_eq!(err, DecodeError::TruncatedHeader { len: 10 });
}

#[test]
fn empty_stream_is_allowed() {
    let program = Program::decode(&ImageBuilder::new().void().build()).unwrap();
    assert!(program.instructions.is_empty());
}

#[test]
fn from_path_reads_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(&sample_image()).unwrap();

    let program = Program::from_path(file.path(), DecodeOptions::default()).unwrap();
    assert_eq!(program, Program::decode(&sample_image()).unwrap());
}

#[test]
fn from_path_missing_file() {
    let dir = tempfile::tempdir().unwrap();

    let err = Program::from_path(dir.path().join("missing.hbc"), DecodeOptions::default())
        .unwrap_err();
    assert!(matches!(err, LoadError::Io(_)));
}

#[test]
fn from_path_decode_error() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(&[0u8; 4]).unwrap();

    let err = Program::from_path(file.path(), DecodeOptions::default()).unwrap_err();
    assert!(matches!(
        err,
        LoadError::Decode(DecodeError::TruncatedHeader { len: 4 })
    ));
}

#[test]
fn json_exposes_declared_and_derived_stream_start() {
    let bytes = ImageBuilder::new().void().code(&[0xFF]).build();
    let program = Program::decode(&bytes).unwrap();

    let value = serde_json::to_value(&program).unwrap();
    assert_eq!(value["header"]["bytecode_offset"], 34);
    assert_eq!(value["layout"]["bytecode"]["start"], 34);
    assert_eq!(value["layout"]["bytecode"]["end"], 35);
    assert!(value["findings"].as_array().unwrap().is_empty());
}

#[test]
fn serializes_to_json() {
    let program = Program::decode(&minimal_image()).unwrap();
    let json = serde_json::to_string_pretty(&program).unwrap();

    insta::assert_snapshot!(json, @r#"
    {
      "header": {
        "magic": [
          104,
          97,
          114,
          112,
          121
        ],
        "version": 1,
        "flags": 0,
        "entry_point": 0,
        "type_table_offset": 33,
        "const_pool_offset": 34,
        "function_table_offset": 34,
        "bytecode_offset": 34,
        "bytecode_size": 1
      },
      "layout": {
        "type_table": {
          "start": 33,
          "end": 34
        },
        "const_pool": {
          "start": 34,
          "end": 34
        },
        "function_table": {
          "start": 34,
          "end": 34
        },
        "bytecode": {
          "start": 34,
          "end": 35
        }
      },
      "types": [
        {
          "kind": "void"
        }
      ],
      "constants": [],
      "functions": [],
      "instructions": [
        {
          "offset": 0,
          "opcode": 255,
          "mnemonic": "HALT",
          "operand": null,
          "size": 1
        }
      ],
      "findings": []
    }
    "#);
}
