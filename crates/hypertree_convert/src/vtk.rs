//! Legacy ASCII VTK writer for unstructured hexahedral grids.
//!
//! Cells are written in mesh order with their corner indices unchanged:
//! the mesh corner order already is the VTK_HEXAHEDRON order.

use anyhow::{Context, Result};
use hypertree::constants::POINTS_PER_CELL;
use hypertree::{OutputMesh, VTK_HEXAHEDRON};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// VTK field names may not contain whitespace.
fn sanitize_name(name: &str) -> String {
	name.split_whitespace().collect::<Vec<_>>().join("_")
}

/// Write `mesh` as a legacy ASCII unstructured grid.
pub fn write_vtk<W: Write>(mesh: &OutputMesh, title: &str, mut out: W) -> io::Result<()> {
	let cells = mesh.cell_count();

	writeln!(out, "# vtk DataFile Version 3.0")?;
	// Header line is limited to one line
	writeln!(out, "{}", title.lines().next().unwrap_or_default())?;
	writeln!(out, "ASCII")?;
	writeln!(out, "DATASET UNSTRUCTURED_GRID")?;

	writeln!(out, "POINTS {} double", mesh.point_count())?;
	for p in &mesh.points {
		writeln!(out, "{} {} {}", p.x, p.y, p.z)?;
	}

	writeln!(out, "CELLS {} {}", cells, cells * (POINTS_PER_CELL + 1))?;
	for cell in &mesh.cells {
		write!(out, "{}", cell.len())?;
		for index in cell {
			write!(out, " {}", index)?;
		}
		writeln!(out)?;
	}

	writeln!(out, "CELL_TYPES {}", cells)?;
	for _ in 0..cells {
		writeln!(out, "{}", VTK_HEXAHEDRON)?;
	}

	writeln!(out, "CELL_DATA {}", cells)?;
	writeln!(out, "SCALARS {} double 1", sanitize_name(&mesh.field.name))?;
	writeln!(out, "LOOKUP_TABLE default")?;
	for value in &mesh.field.values {
		writeln!(out, "{}", value)?;
	}

	out.flush()
}

/// Write `mesh` to `path`.
pub fn save_vtk(mesh: &OutputMesh, title: &str, path: &Path) -> Result<()> {
	let file = File::create(path)
		.with_context(|| format!("Failed to create output file: {}", path.display()))?;
	write_vtk(mesh, title, BufWriter::new(file))
		.with_context(|| format!("Failed to write: {}", path.display()))
}
