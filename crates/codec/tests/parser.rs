use spirv_codec::parser::*;
use spirv_codec::*;

#[test]
fn scalars() {
    let words = [4 << 16 | 21, 1, 32, 1];
    let mut result = IdResult::default();
    let mut width = LiteralInteger::default();
    let mut signedness = LiteralInteger::default();
    parse_type_int(&words, &mut result, &mut width, &mut signedness);
    assert_eq!(result, IdResult::from(1));
    assert_eq!(width.get(), 32);
    assert_eq!(signedness.get(), 1);

    let words = [3 << 16 | 32, 7, 7, 3];
    let mut result = IdResult::default();
    let mut storage_class = spv::StorageClass::default();
    let mut type_ = IdRef::default();
    parse_type_pointer(&words, &mut result, &mut storage_class, &mut type_);
    assert_eq!(storage_class, spv::StorageClass::Function);
    assert_eq!(type_, IdRef::from(3));
}

#[test]
fn instruction_inside_a_module() {
    let module = [
        0x0723_0203,
        0x0001_0000,
        0x0018_0001,
        4,
        0,
        4 << 16 | 5,
        1,
        0x6e69_616d,
        0,
    ];
    let instruction = &module[5..];
    let (op, length) = get_instruction_op_and_length(instruction);
    assert_eq!(op, spv::Op::Name);
    assert_eq!(length, 4);

    let mut target = IdRef::default();
    let mut name = LiteralStr::default();
    parse_name(instruction, &mut target, &mut name);
    assert_eq!(target, IdRef::from(1));
    assert_eq!(name, "main");
    assert_eq!(name.words(), &[0x6e69_616d, 0]);
}

#[test]
fn optional_operands() {
    let words = [3 << 16 | 3, 2, 450];
    let mut language = spv::SourceLanguage::default();
    let mut version = LiteralInteger::default();
    let mut file = Some(IdRef::from(99));
    let mut source = None;
    parse_source(&words, &mut language, &mut version, Some(&mut file), Some(&mut source));
    assert_eq!(language, spv::SourceLanguage::GLSL);
    assert_eq!(version.get(), 450);
    // absent operands leave the outputs untouched
    assert_eq!(file, Some(IdRef::from(99)));
    assert_eq!(source, None);

    let words = [5 << 16 | 3, 2, 450, 3, 0x0063_6261];
    let mut file = None;
    let mut source = None;
    parse_source(&words, &mut language, &mut version, Some(&mut file), Some(&mut source));
    assert_eq!(file, Some(IdRef::from(3)));
    assert_eq!(source.unwrap(), "abc");

    let words = [5 << 16 | 61, 1, 2, 3, 2];
    let mut memory_access = None;
    parse_load(
        &words,
        &mut IdResultType::default(),
        &mut IdResult::default(),
        &mut IdRef::default(),
        Some(&mut memory_access),
    );
    assert_eq!(memory_access, Some(spv::MemoryAccessMask::Aligned));
}

#[test]
fn lists() {
    let words = [7 << 16 | 15, 4, 1, 0x6e69_616d, 0, 2, 3];
    let mut model = spv::ExecutionModel::default();
    let mut entry_point = IdRef::default();
    let mut name = LiteralStr::default();
    let mut interface = Vec::new();
    parse_entry_point(&words, &mut model, &mut entry_point, &mut name, Some(&mut interface));
    assert_eq!(model, spv::ExecutionModel::Fragment);
    assert_eq!(name, "main");
    assert_eq!(interface, [IdRef::from(2), IdRef::from(3)]);

    // lists are appended to
    let words = [4 << 16 | 44, 1, 2, 8];
    let mut constituents = vec![IdRef::from(7)];
    parse_constant_composite(
        &words,
        &mut IdResultType::default(),
        &mut IdResult::default(),
        Some(&mut constituents),
    );
    assert_eq!(constituents, [IdRef::from(7), IdRef::from(8)]);
}

#[test]
fn skipped_list() {
    let words = [6 << 16 | 16, 5, 17, 8, 4, 1];
    let mut entry_point = IdRef::default();
    let mut mode = spv::ExecutionMode::default();
    parse_execution_mode(&words, &mut entry_point, &mut mode, None);
    assert_eq!(entry_point, IdRef::from(5));
    assert_eq!(mode, spv::ExecutionMode::LocalSize);
}

#[test]
fn trailing_operands() {
    let words = [6 << 16 | 16, 5, 17, 8, 4, 1];
    let mut entry_point = IdRef::default();
    let mut mode = spv::ExecutionMode::default();
    let mut operands = Vec::new();
    parse_execution_mode(&words, &mut entry_point, &mut mode, Some(&mut operands));
    assert_eq!(operands, [8, 4, 1].map(LiteralInteger::from));

    let words = [4 << 16 | 71, 9, 30, 2];
    let mut target = IdRef::default();
    let mut decoration = spv::Decoration::default();
    let mut values = Vec::new();
    parse_decorate(&words, &mut target, &mut decoration, Some(&mut values));
    assert_eq!(decoration, spv::Decoration::Location);
    assert_eq!(values, [LiteralInteger::from(2)]);
}

#[test]
fn pairs() {
    let words = [7 << 16 | 245, 1, 2, 3, 4, 5, 6];
    let mut pairs = Vec::new();
    parse_phi(
        &words,
        &mut IdResultType::default(),
        &mut IdResult::default(),
        Some(&mut pairs),
    );
    assert_eq!(
        pairs,
        [
            PairIdRefIdRef {
                id1: IdRef::from(3),
                id2: IdRef::from(4)
            },
            PairIdRefIdRef {
                id1: IdRef::from(5),
                id2: IdRef::from(6)
            },
        ]
    );

    let words = [5 << 16 | 251, 1, 2, 7, 3];
    let mut selector = IdRef::default();
    let mut default = IdRef::default();
    let mut targets = Vec::new();
    parse_switch(&words, &mut selector, &mut default, Some(&mut targets));
    assert_eq!(default, IdRef::from(2));
    assert_eq!(
        targets,
        [PairLiteralIntegerIdRef {
            literal: LiteralInteger::from(7),
            id: IdRef::from(3)
        }]
    );
}

#[test]
fn empty_string() {
    let words = [2 << 16 | 4, 0];
    let mut extension = LiteralStr::default();
    parse_source_extension(&words, &mut extension);
    assert!(extension.is_empty());
    assert_eq!(extension.words(), &[0]);
}

#[test]
#[should_panic]
fn wrong_opcode() {
    let words = [4 << 16 | 5, 1, 0x6e69_616d, 0];
    parse_type_int(
        &words,
        &mut IdResult::default(),
        &mut LiteralInteger::default(),
        &mut LiteralInteger::default(),
    );
}
