/// Positions of the set bits in `mask`, counted from the least significant
/// bit, in ascending order.
pub fn list_enabled_bits(mask: u64) -> Vec<u32> {
    let mut bits = Vec::with_capacity(mask.count_ones() as usize);
    let mut rest = mask;
    while rest != 0 {
        bits.push(rest.trailing_zeros());
        rest &= rest - 1;
    }
    bits
}
