//! Fixed, versioned, little-endian persisted format for [`Connectivity`].
//!
//! Layout: an 80-byte [`DiskHeader`], then the arrays in store order.
//! Vertex arrays are present only when `num_vertices > 0`, the per-tree
//! edge map only when `num_edges > 0`, the per-tree corner map only when
//! `num_corners > 0`, and attribute bytes only when enabled. Omitted
//! per-tree maps are restored as all `-1`.
//!
//! There is no compatibility across format versions: a header written by a
//! different [`ONDISK_FORMAT`] or index width is rejected. Every error is
//! final for that call.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::mem::size_of;
use std::path::Path;

use bytemuck::{Pod, Zeroable};
use static_assertions::assert_eq_size;

use crate::forest_error::ForestError;
use crate::topology::connectivity::{Connectivity, ConnectivityArrays, TopIdx};

/// Bump when the layout or semantics change in incompatible ways.
pub const ONDISK_FORMAT: u64 = 0x300_0008;

/// Identification string at the start of every persisted store.
pub const FORMAT_MAGIC: &str = "p8est";

const MAGIC_BYTES: [u8; 8] = *b"p8est\0\0\0";

/// All integers in the header are **little-endian** on disk.
/// We store them pre-LE with `.to_le()` and decode with `.from_le()`.
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct DiskHeader {
    pub magic: [u8; 8],
    pub format_le: u64,
    pub index_width_le: u64,
    pub num_vertices_le: u64,
    pub num_trees_le: u64,
    pub num_edges_le: u64,
    pub num_ett_le: u64,
    pub num_corners_le: u64,
    pub num_ctt_le: u64,
    pub attr_bytes_le: u64,
}

assert_eq_size!(DiskHeader, [u8; 80]);

/// Counts carried by a header.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
struct Counts {
    num_vertices: usize,
    num_trees: usize,
    num_edges: usize,
    num_ett: usize,
    num_corners: usize,
    num_ctt: usize,
    attr_bytes: usize,
}

impl DiskHeader {
    fn new(conn: &Connectivity) -> Self {
        let le = |n: usize| (n as u64).to_le();
        Self {
            magic: MAGIC_BYTES,
            format_le: ONDISK_FORMAT.to_le(),
            index_width_le: le(size_of::<TopIdx>()),
            num_vertices_le: le(conn.num_vertices()),
            num_trees_le: le(conn.num_trees()),
            num_edges_le: le(conn.num_edges()),
            num_ett_le: le(conn.num_ett()),
            num_corners_le: le(conn.num_corners()),
            num_ctt_le: le(conn.num_ctt()),
            attr_bytes_le: le(usize::from(conn.tree_to_attr().is_some())),
        }
    }

    /// Check identification, version and index width; decode the counts.
    fn counts(&self) -> Result<Counts, ForestError> {
        if self.magic != MAGIC_BYTES {
            return Err(ForestError::FormatMagic);
        }
        let format = u64::from_le(self.format_le);
        if format != ONDISK_FORMAT {
            return Err(ForestError::FormatVersion {
                found: format,
                expected: ONDISK_FORMAT,
            });
        }
        let width = u64::from_le(self.index_width_le);
        if width != size_of::<TopIdx>() as u64 {
            return Err(ForestError::IndexWidth {
                found: width,
                expected: size_of::<TopIdx>() as u64,
            });
        }
        let count = |field: &'static str, raw: u64| {
            let value = u64::from_le(raw);
            if value > TopIdx::MAX as u64 {
                Err(ForestError::CountOutOfRange { field, value })
            } else {
                Ok(value as usize)
            }
        };
        let attr_bytes = u64::from_le(self.attr_bytes_le);
        if attr_bytes > 1 {
            return Err(ForestError::CountOutOfRange {
                field: "attr_bytes",
                value: attr_bytes,
            });
        }
        Ok(Counts {
            num_vertices: count("num_vertices", self.num_vertices_le)?,
            num_trees: count("num_trees", self.num_trees_le)?,
            num_edges: count("num_edges", self.num_edges_le)?,
            num_ett: count("num_ett", self.num_ett_le)?,
            num_corners: count("num_corners", self.num_corners_le)?,
            num_ctt: count("num_ctt", self.num_ctt_le)?,
            attr_bytes: attr_bytes as usize,
        })
    }
}

/// Scalars stored little-endian on disk.
trait LeScalar: Pod {
    fn to_le(self) -> Self;
    fn from_le(self) -> Self;
}

impl LeScalar for i8 {
    fn to_le(self) -> Self {
        self
    }
    fn from_le(self) -> Self {
        self
    }
}

impl LeScalar for i32 {
    fn to_le(self) -> Self {
        i32::to_le(self)
    }
    fn from_le(self) -> Self {
        i32::from_le(self)
    }
}

impl LeScalar for f64 {
    fn to_le(self) -> Self {
        f64::from_bits(self.to_bits().to_le())
    }
    fn from_le(self) -> Self {
        f64::from_bits(u64::from_le(self.to_bits()))
    }
}

fn write_array<W: Write, T: LeScalar>(w: &mut W, values: &[T]) -> Result<usize, ForestError> {
    let le: Vec<T> = values.iter().map(|&v| v.to_le()).collect();
    let bytes: &[u8] = bytemuck::cast_slice(le.as_slice());
    w.write_all(bytes)?;
    Ok(bytes.len())
}

/// Read `len` values, adding the bytes consumed to `read`. The buffer
/// grows with the bytes actually present, so a corrupt count fails on a
/// short read instead of a huge allocation.
fn read_array<R: Read, T: LeScalar>(
    r: &mut R,
    len: usize,
    read: &mut usize,
) -> Result<Vec<T>, ForestError> {
    let want = len
        .checked_mul(size_of::<T>())
        .ok_or(ForestError::CountOutOfRange {
            field: "array length",
            value: len as u64,
        })?;
    let mut buf = Vec::new();
    r.by_ref().take(want as u64).read_to_end(&mut buf)?;
    if buf.len() != want {
        return Err(std::io::Error::from(std::io::ErrorKind::UnexpectedEof).into());
    }
    *read += want;
    Ok(buf
        .chunks_exact(size_of::<T>())
        .map(|chunk| bytemuck::pod_read_unaligned::<T>(chunk).from_le())
        .collect())
}

/// Write `conn` in the persisted format and return the number of bytes
/// written.
pub fn save<W: Write>(conn: &Connectivity, w: &mut W) -> Result<usize, ForestError> {
    let header = DiskHeader::new(conn);
    w.write_all(bytemuck::bytes_of(&header))?;
    let mut written = size_of::<DiskHeader>();

    if conn.num_vertices() > 0 {
        written += write_array(w, conn.vertices())?;
        written += write_array(w, conn.tree_to_vertex())?;
    }
    written += write_array(w, conn.tree_to_tree())?;
    written += write_array(w, conn.tree_to_face())?;
    if conn.num_edges() > 0 {
        written += write_array(w, conn.tree_to_edge())?;
    }
    written += write_array(w, conn.ett_offset())?;
    written += write_array(w, conn.edge_to_tree())?;
    written += write_array(w, conn.edge_to_edge())?;
    if conn.num_corners() > 0 {
        written += write_array(w, conn.tree_to_corner())?;
    }
    written += write_array(w, conn.ctt_offset())?;
    written += write_array(w, conn.corner_to_tree())?;
    written += write_array(w, conn.corner_to_corner())?;
    if let Some(attr) = conn.tree_to_attr() {
        written += write_array(w, attr)?;
    }

    log::trace!("saved connectivity: {written} bytes");
    Ok(written)
}

/// Read a store written by [`save`] and validate it.
///
/// Returns the store and the number of bytes consumed.
pub fn load<R: Read>(r: &mut R) -> Result<(Connectivity, usize), ForestError> {
    let result = load_inner(r);
    if let Err(e) = &result {
        log::warn!("rejecting persisted connectivity: {e}");
    }
    result
}

fn load_inner<R: Read>(r: &mut R) -> Result<(Connectivity, usize), ForestError> {
    let mut header = DiskHeader::zeroed();
    r.read_exact(bytemuck::bytes_of_mut(&mut header))?;
    let c = header.counts()?;
    let mut read = size_of::<DiskHeader>();
    let nt = c.num_trees;

    let (vertices, tree_to_vertex) = if c.num_vertices > 0 {
        (
            read_array::<_, f64>(r, 3 * c.num_vertices, &mut read)?,
            read_array::<_, TopIdx>(r, 8 * nt, &mut read)?,
        )
    } else {
        (Vec::new(), Vec::new())
    };
    let tree_to_tree = read_array::<_, TopIdx>(r, 6 * nt, &mut read)?;
    let tree_to_face = read_array::<_, i8>(r, 6 * nt, &mut read)?;
    let tree_to_edge = if c.num_edges > 0 {
        read_array::<_, TopIdx>(r, 12 * nt, &mut read)?
    } else {
        Vec::new()
    };
    let ett_offset = read_array::<_, TopIdx>(r, c.num_edges + 1, &mut read)?;
    let edge_to_tree = read_array::<_, TopIdx>(r, c.num_ett, &mut read)?;
    let edge_to_edge = read_array::<_, i8>(r, c.num_ett, &mut read)?;
    let tree_to_corner = if c.num_corners > 0 {
        read_array::<_, TopIdx>(r, 8 * nt, &mut read)?
    } else {
        Vec::new()
    };
    let ctt_offset = read_array::<_, TopIdx>(r, c.num_corners + 1, &mut read)?;
    let corner_to_tree = read_array::<_, TopIdx>(r, c.num_ctt, &mut read)?;
    let corner_to_corner = read_array::<_, i8>(r, c.num_ctt, &mut read)?;
    let attr = if c.attr_bytes > 0 {
        Some(read_array::<_, i8>(r, nt, &mut read)?)
    } else {
        None
    };

    let mut conn = Connectivity::from_arrays(ConnectivityArrays {
        num_vertices: c.num_vertices,
        num_trees: nt,
        num_edges: c.num_edges,
        num_corners: c.num_corners,
        vertices: &vertices,
        tree_to_vertex: &tree_to_vertex,
        tree_to_tree: &tree_to_tree,
        tree_to_face: &tree_to_face,
        tree_to_edge: &tree_to_edge,
        ett_offset: &ett_offset,
        edge_to_tree: &edge_to_tree,
        edge_to_edge: &edge_to_edge,
        tree_to_corner: &tree_to_corner,
        ctt_offset: &ctt_offset,
        corner_to_tree: &corner_to_tree,
        corner_to_corner: &corner_to_corner,
    })?;
    if let Some(attr) = attr {
        conn.set_attr(true)?;
        if let Some(dst) = conn.tree_to_attr_mut() {
            dst.copy_from_slice(&attr);
        }
    }

    log::trace!("loaded connectivity: {read} bytes");
    Ok((conn, read))
}

/// [`save`] to a file, created or truncated.
pub fn save_file<P: AsRef<Path>>(conn: &Connectivity, path: P) -> Result<usize, ForestError> {
    let mut w = BufWriter::new(File::create(path)?);
    let written = save(conn, &mut w)?;
    w.flush()?;
    Ok(written)
}

/// [`load`] from a file.
pub fn load_file<P: AsRef<Path>>(path: P) -> Result<Connectivity, ForestError> {
    let mut r = BufReader::new(File::open(path)?);
    load(&mut r).map(|(conn, _)| conn)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh_generation::{periodic, unitcube};

    #[test]
    fn header_layout() {
        let bytes = {
            let mut v = Vec::new();
            save(&unitcube(), &mut v).unwrap();
            v
        };
        assert_eq!(&bytes[..5], FORMAT_MAGIC.as_bytes());
        assert_eq!(&bytes[5..8], &[0, 0, 0]);
        assert_eq!(u64::from_le_bytes(bytes[8..16].try_into().unwrap()), ONDISK_FORMAT);
        assert_eq!(u64::from_le_bytes(bytes[16..24].try_into().unwrap()), 4);
        // num_trees
        assert_eq!(u64::from_le_bytes(bytes[32..40].try_into().unwrap()), 1);
    }

    #[test]
    fn byte_count_matches_layout() {
        let conn = periodic();
        let mut buf = Vec::new();
        let written = save(&conn, &mut buf).unwrap();
        // header, 8 vertices, tree_to_vertex, faces, edges, corners
        let expected = 80
            + 24 * 8
            + 8 * 4
            + 6 * 4
            + 6
            + (12 + 4 + 12) * 4
            + 12
            + (8 + 2 + 8) * 4
            + 8;
        assert_eq!(written, expected);
        assert_eq!(buf.len(), expected);
        let (back, read) = load(&mut buf.as_slice()).unwrap();
        assert_eq!(read, expected);
        assert!(back.is_equal(&conn));
    }

    #[test]
    fn omitted_maps_are_restored_unshared() {
        let conn = unitcube();
        let mut buf = Vec::new();
        save(&conn, &mut buf).unwrap();
        let (back, _) = load(&mut buf.as_slice()).unwrap();
        assert_eq!(back.tree_to_edge(), &[-1; 12]);
        assert_eq!(back.tree_to_corner(), &[-1; 8]);
    }

    #[test]
    fn rejects_foreign_version() {
        let mut buf = Vec::new();
        save(&unitcube(), &mut buf).unwrap();
        buf[8] ^= 1;
        assert!(matches!(
            load(&mut buf.as_slice()),
            Err(ForestError::FormatVersion { expected: ONDISK_FORMAT, .. })
        ));
    }

    #[test]
    fn rejects_bad_magic() {
        let mut buf = Vec::new();
        save(&unitcube(), &mut buf).unwrap();
        buf[0] = b'q';
        assert!(matches!(load(&mut buf.as_slice()), Err(ForestError::FormatMagic)));
    }

    #[test]
    fn rejects_truncated_stream() {
        let mut buf = Vec::new();
        save(&periodic(), &mut buf).unwrap();
        buf.truncate(buf.len() - 1);
        assert!(matches!(load(&mut buf.as_slice()), Err(ForestError::Io(_))));
    }

    #[test]
    fn rejects_huge_counts_without_allocating() {
        let mut buf = Vec::new();
        save(&unitcube(), &mut buf).unwrap();
        // num_trees = 2^40
        buf[32..40].copy_from_slice(&(1u64 << 40).to_le_bytes());
        assert!(matches!(
            load(&mut buf.as_slice()),
            Err(ForestError::CountOutOfRange { field: "num_trees", .. })
        ));
    }
}
