mod tree;

use quickcheck::{Arbitrary, Gen};

/// Things to do to a tree through its public interface.
#[derive(Copy, Clone, Debug)]
pub enum Op<K> {
    /// Randomized insert
    Insert(K),
    /// Delete a node with this key
    Remove(K),
    /// Walk to this key's successor and back
    Neighbours(K),
}

impl<K> Arbitrary for Op<K>
where
    K: Arbitrary,
{
    fn arbitrary(g: &mut Gen) -> Self {
        match g.choose(&[0, 1, 2]).unwrap() {
            0 => Op::Insert(K::arbitrary(g)),
            1 => Op::Remove(K::arbitrary(g)),
            2 => Op::Neighbours(K::arbitrary(g)),
            _ => unreachable!(),
        }
    }
}
