//! Debug hooks for the simplifier
//!
//! A [`CollapseObserver`] sees the mesh before and after every edge merge.
//! [`HtmlDump`] renders those snapshots as SVG panels in an HTML page, one
//! table row per merge. Observers only read the mesh.

use rastermesh_core::{same_normal, Drawable, FacetMesh, Point3f, Result, Vector3f, VertexId};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use tracing::{debug, warn};

/// Width and height of every SVG panel.
pub const DUMP_SVG_SIZE: u32 = 500;

/// Hook points around simplification.
pub trait CollapseObserver {
    fn simplify_started(&mut self, _mesh: &FacetMesh) {}

    /// Called just before `end` is merged into `start`.
    fn before_merge(&mut self, _mesh: &FacetMesh, _start: VertexId, _end: VertexId) {}

    fn after_merge(&mut self, _mesh: &FacetMesh, _start: VertexId, _end: VertexId) {}

    fn simplify_finished(&mut self, _mesh: &FacetMesh) {}

    /// Final state, once the caller is done with the mesh. Never called by
    /// the simplifier itself.
    fn mesh_teardown(&mut self, _mesh: &FacetMesh) {}
}

/// Observer that does nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl CollapseObserver for NoopObserver {}

/// HTML page of SVG snapshots taken around each edge merge.
///
/// Output is best effort: the first failed write disables the dump and the
/// simplification carries on.
///
/// Call [`CollapseObserver::mesh_teardown`] to add the final mesh and close
/// the page. A dump dropped without it still closes any open table and the
/// document.
pub struct HtmlDump<W: Write> {
    out: Option<W>,
    operation: usize,
    last_start: Option<VertexId>,
    table_open: bool,
}

impl HtmlDump<BufWriter<File>> {
    /// Dump to `path`, failing if the file cannot be created.
    pub fn create(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::create(path)?;
        Ok(Self::new(BufWriter::new(file)))
    }

    /// Dump to `path`, or do nothing at all if the file cannot be created.
    pub fn open(path: impl AsRef<Path>) -> Self {
        match File::create(path.as_ref()) {
            Ok(file) => Self::new(BufWriter::new(file)),
            Err(e) => {
                warn!("cannot open debug dump {}: {}", path.as_ref().display(), e);
                Self::disabled()
            }
        }
    }
}

impl<W: Write> HtmlDump<W> {
    pub fn new(out: W) -> Self {
        let mut dump = Self {
            out: Some(out),
            operation: 0,
            last_start: None,
            table_open: false,
        };
        dump.emit(|out| writeln!(out, "<html>\n<body>"));
        dump
    }

    pub fn disabled() -> Self {
        Self {
            out: None,
            operation: 0,
            last_start: None,
            table_open: false,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.out.is_some()
    }

    /// Merges rendered so far.
    pub fn operations(&self) -> usize {
        self.operation
    }

    /// Give back the writer as is, if it is still healthy. Nothing more is
    /// written to it.
    pub fn into_inner(mut self) -> Option<W> {
        self.out.take()
    }

    fn emit(&mut self, render: impl FnOnce(&mut W) -> io::Result<()>) {
        if let Some(out) = self.out.as_mut() {
            if let Err(e) = render(out) {
                warn!("debug dump disabled after write failure: {}", e);
                self.out = None;
            }
        }
    }
}

impl<W: Write> CollapseObserver for HtmlDump<W> {
    fn simplify_started(&mut self, mesh: &FacetMesh) {
        self.table_open = true;
        self.emit(|out| {
            writeln!(
                out,
                "<h2>Mesh Simplify</h2><p>Starting with {} facets and {} vertexes.</p>",
                mesh.facet_count(),
                mesh.vertex_count()
            )?;
            writeln!(out, "<table>")
        });
    }

    fn before_merge(&mut self, mesh: &FacetMesh, start: VertexId, end: VertexId) {
        let operation = self.operation;
        self.operation += 1;
        self.last_start = Some(start);
        self.emit(|out| {
            write!(out, "<tr><th>Operation {} Removing {}-&gt;{}</th>", operation, start, end)?;
            write_panel(out, mesh, start, Some(end))
        });
    }

    fn after_merge(&mut self, mesh: &FacetMesh, start: VertexId, _end: VertexId) {
        self.emit(|out| {
            write_panel(out, mesh, start, None)?;
            writeln!(out, "</tr>")
        });
    }

    fn simplify_finished(&mut self, _mesh: &FacetMesh) {
        self.table_open = false;
        self.emit(|out| writeln!(out, "</table>"));
    }

    fn mesh_teardown(&mut self, mesh: &FacetMesh) {
        let reference = self.last_start.and_then(|v| reference_normal(mesh, v));
        self.emit(|out| {
            writeln!(out, "<h2>Final mesh</h2>")?;
            writeln!(
                out,
                "<p>Final mesh had {} facets and {} vertexes.</p>",
                mesh.facet_count(),
                mesh.live_vertex_count()
            )?;
            writeln!(out, "<p>Mesh of all facets with common normal</p>")?;
            let map = SvgMap::for_mesh(mesh);
            writeln!(out, "{}", svg_open())?;
            write_facets(out, mesh, &map, reference.as_ref())?;
            writeln!(out, "</svg>")?;
            writeln!(out, "</body>\n</html>")?;
            out.flush()
        });
        self.out = None;
    }
}

impl<W: Write> Drop for HtmlDump<W> {
    fn drop(&mut self) {
        let Some(out) = self.out.as_mut() else {
            return;
        };
        let table = if self.table_open { "</table>\n" } else { "" };
        if let Err(e) = write!(out, "{}</body>\n</html>\n", table).and_then(|_| out.flush()) {
            debug!("debug dump not closed: {}", e);
        }
    }
}

/// Maps mesh coordinates onto the SVG canvas.
///
/// Raster rows are emitted at negative y, so y is negated to put row 0 at
/// the top of the panel.
struct SvgMap {
    scale: f32,
}

impl SvgMap {
    fn for_mesh(mesh: &FacetMesh) -> Self {
        let (width, _) = mesh.raster_size();
        let extent = if width > 0 {
            width as f32
        } else {
            let (min, max) = mesh.bounding_box();
            (max.x - min.x).max(max.y - min.y).max(1.0)
        };
        Self {
            scale: DUMP_SVG_SIZE as f32 / extent,
        }
    }

    fn x(&self, p: &Point3f) -> f32 {
        p.x * self.scale
    }

    fn y(&self, p: &Point3f) -> f32 {
        -p.y * self.scale
    }
}

fn svg_open() -> String {
    format!(
        "<svg width=\"{0}\" height=\"{0}\" xmlns=\"http://www.w3.org/2000/svg\" version=\"1.1\">",
        DUMP_SVG_SIZE
    )
}

fn reference_normal(mesh: &FacetMesh, v: VertexId) -> Option<Vector3f> {
    let f = *mesh.vertex(v)?.facets().first()?;
    mesh.facet(f).map(|facet| facet.normal)
}

/// Facets sharing `reference` (all of them if `None`), labelled at their centroid.
fn write_facets<W: Write>(
    out: &mut W,
    mesh: &FacetMesh,
    map: &SvgMap,
    reference: Option<&Vector3f>,
) -> io::Result<()> {
    for (f, facet) in mesh.facets().iter().enumerate() {
        if reference.is_some_and(|n| !same_normal(&facet.normal, n)) {
            continue;
        }
        let [a, b, c] = &facet.points;
        writeln!(
            out,
            "<polygon points=\"{:.1},{:.1} {:.1},{:.1} {:.1},{:.1}\" style=\"fill:lime;stroke:black;stroke-width:1\"/>",
            map.x(a), map.y(a), map.x(b), map.y(b), map.x(c), map.y(c)
        )?;
        let centroid = facet.centroid();
        writeln!(
            out,
            "<text x=\"{:.1}\" y=\"{:.1}\" fill=\"blue\">{}</text>",
            map.x(&centroid),
            map.y(&centroid),
            f
        )?;
    }
    Ok(())
}

fn write_panel<W: Write>(
    out: &mut W,
    mesh: &FacetMesh,
    start: VertexId,
    end: Option<VertexId>,
) -> io::Result<()> {
    let map = SvgMap::for_mesh(mesh);
    let reference = reference_normal(mesh, start);

    write!(out, "<td>{}", svg_open())?;
    write_facets(out, mesh, &map, reference.as_ref())?;

    if let (Some(end), Some(from), Some(to)) = (end, mesh.vertex(start), end.and_then(|e| mesh.vertex(e))) {
        writeln!(
            out,
            "<line x1=\"{:.1}\" y1=\"{:.1}\" x2=\"{:.1}\" y2=\"{:.1}\" style=\"stroke:red;stroke-width:5\"/>",
            map.x(&from.point),
            map.y(&from.point),
            map.x(&to.point),
            map.y(&to.point)
        )?;
        writeln!(
            out,
            "<text x=\"{:.1}\" y=\"{:.1}\" fill=\"black\">{}</text>",
            map.x(&to.point) + 5.0,
            map.y(&to.point) + 5.0,
            end
        )?;
    }

    if let Some(vertex) = mesh.vertex(start) {
        writeln!(
            out,
            "<circle cx=\"{:.1}\" cy=\"{:.1}\" r=\"10\" fill=\"blue\"/>",
            map.x(&vertex.point),
            map.y(&vertex.point)
        )?;
        writeln!(
            out,
            "<text x=\"{:.1}\" y=\"{:.1}\" fill=\"black\">{}</text>",
            map.x(&vertex.point) + 10.0,
            map.y(&vertex.point) + 5.0,
            start
        )?;
    }

    write!(out, "</svg></td>")
}
