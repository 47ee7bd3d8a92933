//! Robustness properties: arbitrary and corrupted containers must never
//! panic the decoder, only return errors.

mod recorder;

use proptest::prelude::*;
use recorder::Recorder;
use visa_bytecode::test_utils::{build_container, RoutineWriter, Writer};
use visa_bytecode::{read_program, LabelKind, Opcode, Version, VisaType};

fn decode(bytes: &[u8]) -> Result<(), visa_bytecode::DecodeError> {
    let mut recorder = Recorder::default();
    read_program(bytes, &mut recorder).map(|_| ())
}

fn valid_container() -> Vec<u8> {
    let version = Version::new(3, 6).unwrap();
    let mut routine = RoutineWriter::kernel(version);
    let tmp = routine.general("tmp", VisaType::Ud, 0, 8);
    let skip = routine.label("skip", LabelKind::Block);

    let mut code = Writer::new(version);
    code.u8(Opcode::Mov as u8);
    code.u8(0x00);
    code.u16(0);
    code.general_operand(0, tmp, 0, 0, 0x0200);
    code.immediate_u32(VisaType::Ud, 42);
    code.u8(Opcode::Jmp as u8);
    code.u8(0x00);
    code.u16(0);
    code.u16(skip as u16);
    code.u8(Opcode::Label as u8);
    code.u16(skip as u16);

    let body = routine.finish(&code.into_vec());
    build_container(version, &[("main", &body)], &[])
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 512,
        .. ProptestConfig::default()
    })]

    #[test]
    fn arbitrary_bytes_never_panic(bytes in prop::collection::vec(any::<u8>(), 0..512)) {
        let res = std::panic::catch_unwind(|| decode(&bytes));
        prop_assert!(res.is_ok(), "decoder panicked on {} arbitrary bytes", bytes.len());
    }

    #[test]
    fn single_byte_corruption_never_panics((pos, value) in (0usize..4096, any::<u8>())) {
        let mut bytes = valid_container();
        let pos = pos % bytes.len();
        bytes[pos] = value;
        let res = std::panic::catch_unwind(|| decode(&bytes));
        prop_assert!(res.is_ok(), "decoder panicked with byte {pos} set to {value:#04x}");
    }

    #[test]
    fn truncation_never_panics(len in 0usize..4096) {
        let bytes = valid_container();
        let len = len % bytes.len();
        let res = std::panic::catch_unwind(|| decode(&bytes[..len]));
        prop_assert!(res.is_ok(), "decoder panicked on {len}-byte prefix");
        prop_assert!(res.unwrap().is_err());
    }
}
