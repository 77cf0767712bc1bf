//! Enumeration of circular arrangements of symmetric pairs.
//!
//! `n` pairs `(primary, partner)` are laid out on a circle of `2n` positions
//! so that the two members of a pair always sit diametrically opposite
//! (`p` and `(p + n) mod 2n`). Both generators anchor the first pair so no
//! two outputs are rotations of each other, and both keep the input pair
//! order. Neither ranks its output; choosing among the candidates is left to
//! the caller.
//!
//! - [`diametric_arrangements`]: backtracking over primary positions
//! - [`oriented_arrangements`]: choice of orientation per remaining pair

/// Generator A: constrained backtracking over primary positions.
///
/// The first primary is fixed at position 0. Each following pair's primary
/// takes an unused position strictly after the previous primary; its partner
/// fills the diametric position. Every completed placement yields one
/// `2n`-long arrangement.
pub fn diametric_arrangements<T: Clone>(pairs: &[(T, T)]) -> Vec<Vec<T>> {
    let n = pairs.len();
    if n == 0 {
        return Vec::new();
    }

    let size = 2 * n;
    // layout[pos] = (pair index, is primary)
    let mut layout: Vec<Option<(usize, bool)>> = vec![None; size];
    layout[0] = Some((0, true));
    layout[n] = Some((0, false));

    let mut out = Vec::new();
    place_primary(pairs, 1, 0, &mut layout, &mut out);
    tracing::trace!(pairs = n, arrangements = out.len(), "diametric arrangements enumerated");
    out
}

fn place_primary<T: Clone>(
    pairs: &[(T, T)],
    pair: usize,
    previous: usize,
    layout: &mut [Option<(usize, bool)>],
    out: &mut Vec<Vec<T>>,
) {
    let n = pairs.len();
    if pair == n {
        out.push(
            layout
                .iter()
                .flatten()
                .map(|&(i, primary)| {
                    if primary {
                        pairs[i].0.clone()
                    } else {
                        pairs[i].1.clone()
                    }
                })
                .collect(),
        );
        return;
    }

    let size = layout.len();
    for position in previous + 1..size {
        // A free position always has a free diametric partner.
        if layout[position].is_some() {
            continue;
        }
        let opposite = (position + n) % size;
        layout[position] = Some((pair, true));
        layout[opposite] = Some((pair, false));
        place_primary(pairs, pair + 1, position, layout, out);
        layout[position] = None;
        layout[opposite] = None;
    }
}

/// Generator B: one orientation choice per remaining pair.
///
/// The first pair stays in natural order; each of the other `n - 1` pairs is
/// either primary-first or partner-first, giving `2^(n-1)` arrangements laid
/// out as `[heads..] + [tails..]`. Enumeration order follows the binary
/// counter over orientations, lowest pair index as the least significant bit.
pub fn oriented_arrangements<T: Clone>(pairs: &[(T, T)]) -> Vec<Vec<T>> {
    let Some(((first_head, first_tail), rest)) = pairs.split_first() else {
        return Vec::new();
    };

    if rest.len() >= usize::BITS as usize {
        tracing::warn!(pairs = pairs.len(), "too many pairs to enumerate orientations");
        return Vec::new();
    }
    let count = 1usize << rest.len();

    let out: Vec<Vec<T>> = (0..count)
        .map(|mask| {
            let mut heads = Vec::with_capacity(pairs.len() * 2);
            let mut tails = Vec::with_capacity(pairs.len());
            heads.push(first_head.clone());
            tails.push(first_tail.clone());
            for (bit, (primary, partner)) in rest.iter().enumerate() {
                if mask & (1 << bit) == 0 {
                    heads.push(primary.clone());
                    tails.push(partner.clone());
                } else {
                    heads.push(partner.clone());
                    tails.push(primary.clone());
                }
            }
            heads.extend(tails);
            heads
        })
        .collect();
    tracing::trace!(pairs = pairs.len(), arrangements = out.len(), "oriented arrangements enumerated");
    out
}

/// Whether `arrangement` places every pair diametrically opposite and uses
/// each pair member exactly once.
pub fn is_diametric<T: PartialEq>(arrangement: &[T], pairs: &[(T, T)]) -> bool {
    let n = pairs.len();
    if arrangement.len() != 2 * n {
        return false;
    }
    pairs.iter().all(|(primary, partner)| {
        let positions: Vec<usize> = arrangement
            .iter()
            .enumerate()
            .filter(|(_, item)| *item == primary)
            .map(|(pos, _)| pos)
            .collect();
        match positions.as_slice() {
            [pos] => {
                arrangement[(pos + n) % (2 * n)] == *partner
                    && arrangement.iter().filter(|item| *item == partner).count() == 1
            }
            _ => false,
        }
    })
}
