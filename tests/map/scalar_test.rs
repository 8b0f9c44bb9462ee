/*!
 * Scalar Marshalling Tests
 * Width and byte-order round-trips for scalars and pointers
 */

use pretty_assertions::assert_eq;

use jitmap::{AllocationPolicy, ByteOrder, MapError, MemoryMap, Scalar};

use crate::common::{self, MockProcess, MockTarget};

fn host_map_with_order(order: ByteOrder) -> (std::sync::Arc<dyn jitmap::Target>, MemoryMap) {
    let (_mock, target) = common::target_arc(MockTarget::new().with_byte_order(order));
    let map = MemoryMap::new().with_target(&target);
    (target, map)
}

#[test]
fn test_scalar_roundtrip_all_widths_both_orders() {
    for order in [ByteOrder::Little, ByteOrder::Big] {
        let (_target, mut map) = host_map_with_order(order);
        let addr = map
            .malloc(32, 8, common::rw(), AllocationPolicy::HostOnly, true)
            .unwrap();

        for width in [1usize, 2, 4, 8] {
            let value = if width < 8 {
                0x1122_3344_5566_7788u64 & ((1u64 << (width * 8)) - 1)
            } else {
                0x1122_3344_5566_7788u64
            };

            map.write_scalar(addr, &Scalar::new(value, width), Some(width))
                .unwrap();

            let scalar = map.read_scalar(addr, width).unwrap();
            assert_eq!(scalar.value(), value);
            assert_eq!(scalar.byte_size(), width);
        }
    }
}

#[test]
fn test_scalar_bytes_on_the_wire() {
    let (_target, mut map) = host_map_with_order(ByteOrder::Big);
    let addr = map
        .malloc(8, 8, common::rw(), AllocationPolicy::HostOnly, true)
        .unwrap();

    map.write_scalar(addr, &Scalar::from(0x1122_3344u32), None)
        .unwrap();
    assert_eq!(
        map.read_memory(addr, 4).unwrap(),
        vec![0x11, 0x22, 0x33, 0x44]
    );

    let (_target, mut map) = host_map_with_order(ByteOrder::Little);
    let addr = map
        .malloc(8, 8, common::rw(), AllocationPolicy::HostOnly, true)
        .unwrap();

    map.write_scalar(addr, &Scalar::from(0x1122_3344u32), None)
        .unwrap();
    assert_eq!(
        map.read_memory(addr, 4).unwrap(),
        vec![0x44, 0x33, 0x22, 0x11]
    );
}

#[test]
fn test_scalar_natural_size() {
    let (_target, mut map) = host_map_with_order(ByteOrder::Little);
    let addr = map
        .malloc(8, 8, common::rw(), AllocationPolicy::HostOnly, true)
        .unwrap();

    // No explicit size: a u16 scalar writes exactly two bytes
    map.write_scalar(addr, &Scalar::from(0xABCDu16), None)
        .unwrap();

    assert_eq!(map.read_scalar(addr, 2).unwrap().value(), 0xABCD);
    assert_eq!(map.read_memory(addr + 2, 2).unwrap(), vec![0, 0]);
}

#[test]
fn test_scalar_truncates_to_requested_width() {
    let (_target, mut map) = host_map_with_order(ByteOrder::Little);
    let addr = map
        .malloc(8, 8, common::rw(), AllocationPolicy::HostOnly, true)
        .unwrap();

    map.write_scalar(addr, &Scalar::from(0xAABB_CCDDu64), Some(2))
        .unwrap();

    assert_eq!(map.read_scalar(addr, 2).unwrap().value(), 0xCCDD);
}

#[test]
fn test_scalar_size_errors() {
    let (_target, mut map) = host_map_with_order(ByteOrder::Little);
    let addr = map
        .malloc(16, 8, common::rw(), AllocationPolicy::HostOnly, true)
        .unwrap();

    assert_eq!(
        map.write_scalar(addr, &Scalar::from(1u32), Some(0)),
        Err(MapError::ZeroSize)
    );
    assert_eq!(
        map.write_scalar(addr, &Scalar::from(1u32), Some(33)),
        Err(MapError::UnsupportedSize(33))
    );
    assert_eq!(map.read_scalar(addr, 0), Err(MapError::ZeroSize));
    assert_eq!(map.read_scalar(addr, 3), Err(MapError::UnsupportedSize(3)));
    assert_eq!(map.read_scalar(addr, 16), Err(MapError::UnsupportedSize(16)));
}

#[test]
fn test_pointer_roundtrip_4_byte_width() {
    let (_mock, target) = common::target_arc(
        MockTarget::new()
            .with_byte_order(ByteOrder::Little)
            .with_address_byte_size(4),
    );
    let mut map = MemoryMap::new().with_target(&target);

    let a1 = map
        .malloc(16, 8, common::rw(), AllocationPolicy::HostOnly, true)
        .unwrap();

    map.write_pointer(a1, 0xDEAD_BEEF).unwrap();

    assert_eq!(map.read_pointer(a1).unwrap(), 0xDEAD_BEEF);
    assert_eq!(
        map.read_memory(a1, 4).unwrap(),
        vec![0xEF, 0xBE, 0xAD, 0xDE]
    );
}

#[test]
fn test_pointer_roundtrip_8_byte_width() {
    let (_mock, target) = common::target_arc(
        MockTarget::new()
            .with_byte_order(ByteOrder::Big)
            .with_address_byte_size(8),
    );
    let mut map = MemoryMap::new().with_target(&target);

    let a1 = map
        .malloc(16, 8, common::rw(), AllocationPolicy::HostOnly, true)
        .unwrap();

    map.write_pointer(a1, 0x1122_3344_5566_7788).unwrap();
    assert_eq!(map.read_pointer(a1).unwrap(), 0x1122_3344_5566_7788);
}

#[test]
fn test_scalar_roundtrip_through_remote() {
    let (_mock, process) = common::process_arc(MockProcess::new());
    let mut map = MemoryMap::new().with_process(&process);

    let addr = map
        .malloc(16, 8, common::rw(), AllocationPolicy::ProcessOnly, true)
        .unwrap();

    map.write_scalar(addr, &Scalar::from(0xCAFE_F00Du32), Some(4))
        .unwrap();

    assert_eq!(map.read_scalar(addr, 4).unwrap().value(), 0xCAFE_F00D);
}
