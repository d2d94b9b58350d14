//! Bulk construction from integer tables, and the reverse dump to Rust source.
//!
//! `adj[s][f]` is the simplex glued to facet `f` of simplex `s` (`-1` for
//! boundary) and `gluing[s][f]` is the image tuple of that gluing. The tables
//! index the new simplices from zero; they are appended after any existing
//! simplices.

use std::fmt::Write as _;
use std::ops::Range;

use super::Triangulation;
use crate::topology::perm::Perm;
use crate::topology::simplex::Simplex;
use crate::tri_error::TriSieveError;

impl<const N: usize> Triangulation<N> {
    /// Appends `adj.len()` simplices glued as the tables describe; returns
    /// their index range.
    ///
    /// The tables are checked in full before anything is added: shapes must
    /// agree, every target must be in range, every gluing must be a
    /// permutation and both sides of every gluing must agree.
    pub fn insert_construction(
        &mut self,
        adj: &[[i64; N]],
        gluing: &[[[u8; N]; N]],
    ) -> Result<Range<usize>, TriSieveError> {
        let simplices = build_simplices(adj, gluing)?;
        Ok(self.append_constructed(simplices))
    }

    fn append_constructed(&mut self, simplices: Vec<Simplex<N>>) -> Range<usize> {
        let mut span = self.change_span();
        let offset = span.simplices.len();
        for mut s in simplices {
            for t in s.adj.iter_mut().flatten() {
                *t += offset;
            }
            span.simplices.push(s);
        }
        offset..span.simplices.len()
    }

    /// Rust source declaring `adj` and `gluing` tables for this
    /// triangulation, followed by the call that rebuilds it.
    pub fn dump_construction(&self) -> String {
        let n = self.size();
        let mut out = String::new();
        let _ = writeln!(out, "// {} {}", n, super::simplex_name(N).to_lowercase());
        let _ = writeln!(out, "let adj: [[i64; {N}]; {n}] = [");
        for s in &self.simplices {
            let row: Vec<String> = (0..N)
                .map(|f| s.adj[f].map_or(-1, |t| t as i64).to_string())
                .collect();
            let _ = writeln!(out, "    [{}],", row.join(", "));
        }
        let _ = writeln!(out, "];");
        let _ = writeln!(out, "let gluing: [[[u8; {N}]; {N}]; {n}] = [");
        for s in &self.simplices {
            let row: Vec<String> = (0..N)
                .map(|f| {
                    let images = if s.adj[f].is_some() {
                        s.gluing[f].images()
                    } else {
                        Perm::<N>::identity().images()
                    };
                    let items: Vec<String> = images.iter().map(u8::to_string).collect();
                    format!("[{}]", items.join(", "))
                })
                .collect();
            let _ = writeln!(out, "    [{}],", row.join(", "));
        }
        let _ = writeln!(out, "];");
        let _ = writeln!(out, "let mut tri = Triangulation::<{N}>::new();");
        let _ = writeln!(out, "tri.insert_construction(&adj, &gluing)?;");
        out
    }
}

fn build_simplices<const N: usize>(
    adj: &[[i64; N]],
    gluing: &[[[u8; N]; N]],
) -> Result<Vec<Simplex<N>>, TriSieveError> {
    if adj.len() != gluing.len() {
        return Err(TriSieveError::ConstructionMismatch(format!(
            "{} adjacency rows but {} gluing rows",
            adj.len(),
            gluing.len()
        )));
    }
    let n = adj.len();
    let mut simplices = vec![Simplex::<N>::default(); n];
    for (s, (row, perms)) in adj.iter().zip(gluing).enumerate() {
        for f in 0..N {
            match row[f] {
                -1 => {}
                t if t >= 0 && (t as usize) < n => {
                    simplices[s].adj[f] = Some(t as usize);
                    simplices[s].gluing[f] = Perm::from_images(perms[f])?;
                }
                t => {
                    return Err(TriSieveError::ConstructionMismatch(format!(
                        "simplex {s} facet {f} points at {t}, outside 0..{n}"
                    )));
                }
            }
        }
    }
    for s in 0..n {
        for f in 0..N {
            let Some((t, g)) = simplices[s].glued(f) else {
                continue;
            };
            let tf = g.image(f);
            let back = &simplices[t];
            if back.adj[tf] != Some(s) || back.gluing[tf] != g.inverse() {
                return Err(TriSieveError::ConstructionMismatch(format!(
                    "simplex {s} facet {f} is not matched by simplex {t} facet {tf}"
                )));
            }
        }
    }
    Ok(simplices)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::debug_invariants::DebugInvariants;

    const SPHERE_ADJ: [[i64; 3]; 2] = [[1, 1, 1], [0, 0, 0]];
    const SPHERE_GLUING: [[[u8; 3]; 3]; 2] = [[[0, 1, 2]; 3], [[0, 1, 2]; 3]];

    #[test]
    fn builds_two_triangle_sphere() {
        let mut tri = Triangulation::<3>::new();
        let range = tri.insert_construction(&SPHERE_ADJ, &SPHERE_GLUING).unwrap();
        assert_eq!(range, 0..2);
        assert!(!tri[0].has_boundary());
        tri.validate_invariants().unwrap();
    }

    #[test]
    fn appends_after_existing_simplices() {
        let mut tri = Triangulation::<3>::new();
        tri.new_simplex();
        let range = tri.insert_construction(&SPHERE_ADJ, &SPHERE_GLUING).unwrap();
        assert_eq!(range, 1..3);
        assert_eq!(tri[1].adjacent_simplex(0), Some(2));
        assert!(tri[0].is_isolated());
    }

    #[test]
    fn rejects_unmatched_gluings() {
        let adj = [[1i64, -1, -1], [-1, -1, -1]];
        let gluing = [[[0u8, 1, 2]; 3]; 2];
        let mut tri = Triangulation::<3>::new();
        assert!(matches!(
            tri.insert_construction(&adj, &gluing),
            Err(TriSieveError::ConstructionMismatch(_))
        ));
        assert!(tri.is_empty());
    }

    #[test]
    fn rejects_bad_permutations_and_targets() {
        let mut tri = Triangulation::<3>::new();
        let bad_perm = [[[0u8, 0, 2]; 3], [[0, 1, 2]; 3]];
        assert!(matches!(
            tri.insert_construction(&SPHERE_ADJ, &bad_perm),
            Err(TriSieveError::InvalidPermutation(_))
        ));
        let bad_target = [[7i64, -1, -1]];
        assert!(tri
            .insert_construction(&bad_target, &[[[0, 1, 2]; 3]])
            .is_err());
    }

    #[test]
    fn dump_mentions_tables_and_call() {
        let mut tri = Triangulation::<3>::new();
        tri.insert_construction(&SPHERE_ADJ, &SPHERE_GLUING).unwrap();
        let src = tri.dump_construction();
        assert!(src.contains("let adj: [[i64; 3]; 2] = ["));
        assert!(src.contains("    [1, 1, 1],"));
        assert!(src.contains("[[0, 1, 2], [0, 1, 2], [0, 1, 2]],"));
        assert!(src.contains("tri.insert_construction(&adj, &gluing)?;"));
    }
}
