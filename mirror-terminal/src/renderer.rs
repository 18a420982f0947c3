/// ASCII rasterizer for terminal rendering
use crossterm::{
    style::{Color, Print, ResetColor, SetForegroundColor},
    QueueableCommand,
};
use mirror_core::{Camera, InterleavedMesh, Scene, Transform};
use nalgebra::{Matrix4, Point3, Vector3};
use std::io::Write;

/// Character luminosity ramp for shading (darkest to lightest)
const LUMINOSITY_RAMP: &[char] = &[' ', '.', ':', '-', '=', '+', '*', '#', '%', '@'];

/// Glyph for mirror cells with nothing reflected in them
const MIRROR_GLYPH: char = '~';

/// Brightness multiplier applied to the reflected copy
const REFLECTION_DIM: f32 = 0.6;

/// One terminal character cell
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cell {
    pub glyph: char,
    pub color: Color,
}

impl Cell {
    const BLANK: Cell = Cell {
        glyph: ' ',
        color: Color::Reset,
    };
}

/// What a rasterized fragment does to the buffers
#[derive(Debug, Clone, Copy)]
enum Pass {
    /// Write 1 into the stencil buffer only
    MarkStencil,
    /// Depth-tested colour write where the stencil is set
    Reflection(Cell),
    /// Mirror surface: fill empty stencil cells and take over their depth
    Surface,
    /// Ordinary depth-tested colour write
    Model(Cell),
}

/// ASCII renderer that converts 3D meshes to terminal characters
pub struct AsciiRenderer {
    width: usize,
    height: usize,
    depth_buffer: Vec<f32>,
    stencil_buffer: Vec<u8>,
    cells: Vec<Cell>,
}

impl AsciiRenderer {
    pub fn new(width: usize, height: usize) -> Self {
        let size = width * height;
        Self {
            width,
            height,
            depth_buffer: vec![f32::INFINITY; size],
            stencil_buffer: vec![0; size],
            cells: vec![Cell::BLANK; size],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn clear(&mut self) {
        self.depth_buffer.fill(f32::INFINITY);
        self.stencil_buffer.fill(0);
        self.cells.fill(Cell::BLANK);
    }

    pub fn cell(&self, x: usize, y: usize) -> Option<Cell> {
        (x < self.width && y < self.height).then(|| self.cells[y * self.width + x])
    }

    pub fn stencil(&self, x: usize, y: usize) -> Option<u8> {
        (x < self.width && y < self.height).then(|| self.stencil_buffer[y * self.width + x])
    }

    /// Draw the model, its mirrored duplicate and the mirror surface
    pub fn render_scene(&mut self, scene: &Scene) {
        let mirror = scene.mirror.corners();
        let quad = [[mirror[0], mirror[1], mirror[2]], [mirror[0], mirror[2], mirror[3]]];

        for tri in &quad {
            self.render_flat(tri, &scene.camera, Pass::MarkStencil);
        }

        let mesh = scene.model.mesh();
        self.render_mesh(mesh, &scene.mirrored_model_matrix(), scene, true);

        for tri in &quad {
            self.render_flat(tri, &scene.camera, Pass::Surface);
        }

        self.render_mesh(mesh, &scene.model_matrix(), scene, false);
    }

    pub fn render_mesh(
        &mut self,
        mesh: &InterleavedMesh,
        model_matrix: &Matrix4<f32>,
        scene: &Scene,
        reflected: bool,
    ) {
        let normal_matrix = Transform::normal_matrix(model_matrix);

        'triangles: for triangle in mesh.triangles() {
            // Project vertices to screen space; the rasterizer clips to the
            // screen, triangles crossing the near or far plane are dropped
            let mut screen_coords = [(0.0, 0.0, 0.0); 3];
            for (slot, vertex) in screen_coords.iter_mut().zip(&triangle.vertices) {
                match scene.camera.project_point(
                    &vertex.position,
                    model_matrix,
                    self.width as u32,
                    self.height as u32,
                ) {
                    Some(coords) => *slot = coords,
                    None => continue 'triangles,
                }
            }

            let centroid = Point3::from(
                triangle
                    .vertices
                    .iter()
                    .map(|v| model_matrix.transform_point(&v.position).coords)
                    .sum::<Vector3<f32>>()
                    / 3.0,
            );
            // Geometry below the mirror has no reflection; its mirrored copy lands above
            if reflected && scene.mirror.distance(&centroid) > 0.0 {
                continue;
            }

            let normal = (normal_matrix * triangle.average_normal())
                .try_normalize(f32::EPSILON)
                .unwrap_or_else(Vector3::zeros);
            let mut color = scene.light.shade(&scene.material, &centroid, &normal);
            if reflected {
                color *= REFLECTION_DIM;
            }

            let cell = shade_cell(&color);
            let pass = if reflected {
                Pass::Reflection(cell)
            } else {
                Pass::Model(cell)
            };
            self.rasterize_triangle(&screen_coords, pass);
        }
    }

    fn render_flat(&mut self, tri: &[Point3<f32>; 3], camera: &Camera, pass: Pass) {
        let identity = Matrix4::identity();
        let mut screen_coords = [(0.0, 0.0, 0.0); 3];
        for (slot, point) in screen_coords.iter_mut().zip(tri) {
            match camera.project_point(point, &identity, self.width as u32, self.height as u32) {
                Some(coords) => *slot = coords,
                None => return,
            }
        }
        self.rasterize_triangle(&screen_coords, pass);
    }

    fn rasterize_triangle(&mut self, coords: &[(f32, f32, f32); 3], pass: Pass) {
        let (v0, v1, v2) = (coords[0], coords[1], coords[2]);

        // Bounding box
        let min_x = v0.0.min(v1.0).min(v2.0).floor() as i32;
        let max_x = v0.0.max(v1.0).max(v2.0).ceil() as i32;
        let min_y = v0.1.min(v1.1).min(v2.1).floor() as i32;
        let max_y = v0.1.max(v1.1).max(v2.1).ceil() as i32;

        // Clip to screen bounds
        let min_x = min_x.max(0);
        let max_x = max_x.min(self.width as i32 - 1);
        let min_y = min_y.max(0);
        let max_y = max_y.min(self.height as i32 - 1);

        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let px = x as f32 + 0.5;
                let py = y as f32 + 0.5;

                // Either winding is accepted: reflected triangles arrive flipped
                let Some((w0, w1, w2)) =
                    barycentric((v0.0, v0.1), (v1.0, v1.1), (v2.0, v2.1), (px, py))
                else {
                    continue;
                };
                if w0 < 0.0 || w1 < 0.0 || w2 < 0.0 {
                    continue;
                }

                let depth = w0 * v0.2 + w1 * v1.2 + w2 * v2.2;
                let idx = y as usize * self.width + x as usize;
                self.write_fragment(idx, depth, pass);
            }
        }
    }

    fn write_fragment(&mut self, idx: usize, depth: f32, pass: Pass) {
        match pass {
            Pass::MarkStencil => self.stencil_buffer[idx] = 1,
            Pass::Surface => {
                if self.stencil_buffer[idx] == 1 {
                    if self.cells[idx].glyph == ' ' {
                        self.cells[idx] = Cell {
                            glyph: MIRROR_GLYPH,
                            color: Color::DarkBlue,
                        };
                    }
                    self.depth_buffer[idx] = depth;
                }
            }
            Pass::Reflection(cell) => {
                if self.stencil_buffer[idx] == 1 && depth < self.depth_buffer[idx] {
                    self.depth_buffer[idx] = depth;
                    self.cells[idx] = cell;
                }
            }
            Pass::Model(cell) => {
                if depth < self.depth_buffer[idx] {
                    self.depth_buffer[idx] = depth;
                    self.cells[idx] = cell;
                }
            }
        }
    }

    pub fn draw<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        for row in self.cells.chunks(self.width.max(1)) {
            for cell in row {
                writer.queue(SetForegroundColor(cell.color))?;
                writer.queue(Print(cell.glyph))?;
            }
            writer.queue(Print("\r\n"))?;
        }
        writer.queue(ResetColor)?;
        Ok(())
    }
}

/// Map a shaded RGB colour to a ramp glyph and a terminal colour
fn shade_cell(color: &Vector3<f32>) -> Cell {
    let c = color.map(|v| v.clamp(0.0, 1.0));
    let brightness = c.max();

    // Map brightness to character; keep lit surfaces off the blank glyph
    let char_index = (brightness * (LUMINOSITY_RAMP.len() - 1) as f32) as usize;
    let char_index = char_index.clamp(1, LUMINOSITY_RAMP.len() - 1);

    Cell {
        glyph: LUMINOSITY_RAMP[char_index],
        color: Color::Rgb {
            r: (c.x * 255.0) as u8,
            g: (c.y * 255.0) as u8,
            b: (c.z * 255.0) as u8,
        },
    }
}

/// Calculate barycentric coordinates for a point in a triangle
fn barycentric(
    v0: (f32, f32),
    v1: (f32, f32),
    v2: (f32, f32),
    p: (f32, f32),
) -> Option<(f32, f32, f32)> {
    let denom = (v1.1 - v2.1) * (v0.0 - v2.0) + (v2.0 - v1.0) * (v0.1 - v2.1);

    if denom.abs() < 1e-6 {
        return None;
    }

    let w0 = ((v1.1 - v2.1) * (p.0 - v2.0) + (v2.0 - v1.0) * (p.1 - v2.1)) / denom;
    let w1 = ((v2.1 - v0.1) * (p.0 - v2.0) + (v0.0 - v2.0) * (p.1 - v2.1)) / denom;
    let w2 = 1.0 - w0 - w1;

    Some((w0, w1, w2))
}
