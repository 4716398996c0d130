//! Patch assembler: sequences caps, logos, map body, stitches and shell into
//! one mesh with a single id allocator threaded through every stage.
//!
//! ```text
//! Idle -> ExtractHeights -> BuildNorth -> BuildMapBody -> StitchNorth
//!      -> BuildSouth -> StitchSouth -> BuildInnerShell -> Done
//! ```
//!
//! Any failing stage aborts the whole run; no partial mesh is returned.

use std::f64::consts::FRAC_PI_2;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::boundary::{Extreme, points_at_extreme};
use crate::cap::{cap_patch, shell_patch};
use crate::error::MeshError;
use crate::field::{ColorField, HeightField};
use crate::logo::logo_patch;
use crate::map::{RasterSampling, map_patch, paint_patch};
use crate::mesh::{Mesh, Patch, PointIds, Row};
use crate::modulator::{FLAT_EPSILON, Meridian, Overlays, RadiusMap};
use crate::projection::ProjectionKind;
use crate::triangulate::{faces_for_rows, stitch_rows};
use crate::winding;

/// Polar cap policy.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Caps {
    /// Caps start where the map ends (none for equal-area projections).
    #[default]
    Auto,
    /// No caps; the poles stay open unless a logo covers them.
    None,
    /// Caps covering this many degrees from each pole.
    Angle(f64),
}

/// Structured, validated parameters of one mesh build.
#[derive(Clone, Debug, PartialEq)]
pub struct MeshSettings {
    /// Projection the height raster is drawn in.
    pub projection: ProjectionKind,
    /// Point budget; 0 samples every raster cell.
    pub points: usize,
    /// Fraction of the radius between the lowest and highest terrain.
    pub scale: f64,
    /// Polar cap policy.
    pub caps: Caps,
    /// Radius of the caps (and base radius of logos).
    pub caps_height: f64,
    /// Raised meridians (radians).
    pub meridians: Vec<Meridian>,
    /// Meridian radius at the equator.
    pub meridians_height: f64,
    /// Full angular width of the equatorial band (radians, 0 = none).
    pub equator_width: f64,
    /// Radius of the equatorial band.
    pub equator_height: f64,
    /// Hollow shell thickness (0 = solid).
    pub thickness: f64,
    /// Emit faces and stitches; point clouds set this to false.
    pub with_faces: bool,
    /// Height ranges at or below this are treated as flat.
    pub flat_epsilon: f64,
}

impl Default for MeshSettings {
    fn default() -> Self {
        Self {
            projection: ProjectionKind::Mercator,
            points: 0,
            scale: 0.02,
            caps: Caps::Auto,
            caps_height: 1.03,
            meridians: vec![Meridian::from_degrees(0.0, 1.0)],
            meridians_height: 1.03,
            equator_width: 0.0,
            equator_height: 1.03,
            thickness: 0.0,
            with_faces: true,
            flat_epsilon: FLAT_EPSILON,
        }
    }
}

impl MeshSettings {
    /// Fail fast on parameters that cannot produce a mesh.
    pub fn validate(&self) -> Result<(), MeshError> {
        if let Caps::Angle(deg) = self.caps {
            if !(deg > 0.0 && deg < 90.0) {
                return Err(MeshError::InvalidCaps(deg));
            }
        }
        if !(self.scale.is_finite() && self.scale >= 0.0) {
            return Err(MeshError::InvalidScale(self.scale));
        }
        if !(self.thickness >= 0.0 && self.thickness < 1.0) {
            return Err(MeshError::InvalidThickness(self.thickness));
        }
        for (k, m) in self.meridians.iter().enumerate() {
            if !m.position.is_finite() || !(m.width.is_finite() && m.width >= 0.0) {
                return Err(MeshError::InvalidMeridians(format!(
                    "meridian {k} has position {} and width {}",
                    m.position, m.width
                )));
            }
        }
        Ok(())
    }

    /// Caps after resolving `Auto` for equal-area projections, which have no
    /// rectangular top edge to cap. Azimuthal maps never take caps: their
    /// rim is a chord of the disk, not a latitude ring.
    pub fn resolved_caps(&self) -> Caps {
        match self.caps {
            _ if self.projection.is_azimuthal() => Caps::None,
            Caps::Auto if self.projection.is_equal_area() => Caps::None,
            caps => caps,
        }
    }
}

/// A logo height field and the factor applied to its normalised heights.
#[derive(Clone, Debug, PartialEq)]
pub struct LogoSettings {
    /// Logo raster.
    pub heights: HeightField,
    /// Multiplier on the normalised logo heights.
    pub scale: f64,
}

/// Optional logos replacing the polar caps.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Logos {
    /// Logo over the north pole.
    pub north: Option<LogoSettings>,
    /// Logo over the south pole.
    pub south: Option<LogoSettings>,
}

/// Assembly stage.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Stage {
    /// Nothing started yet.
    #[default]
    Idle,
    /// Heights mapped to radii and sampling strides chosen.
    ExtractHeights,
    /// North cap or logo.
    BuildNorth,
    /// Rows of the map raster.
    BuildMapBody,
    /// Faces joining the north patch to the first map row.
    StitchNorth,
    /// South cap or logo.
    BuildSouth,
    /// Faces joining the last map row to the south patch.
    StitchSouth,
    /// Inverted inner sphere of a hollow mesh.
    BuildInnerShell,
    /// Mesh complete.
    Done,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::ExtractHeights => "extract-heights",
            Self::BuildNorth => "build-north",
            Self::BuildMapBody => "build-map-body",
            Self::StitchNorth => "stitch-north",
            Self::BuildSouth => "build-south",
            Self::StitchSouth => "stitch-south",
            Self::BuildInnerShell => "build-inner-shell",
            Self::Done => "done",
        };
        f.write_str(name)
    }
}

/// A polar patch together with the ring it is stitched to the map along.
struct Polar {
    patch: Patch,
    boundary: Row,
}

struct Assembler<'a> {
    settings: &'a MeshSettings,
    stage: Stage,
    ids: PointIds,
    mesh: Mesh,
}

impl<'a> Assembler<'a> {
    fn new(settings: &'a MeshSettings) -> Self {
        Self {
            settings,
            stage: Stage::Idle,
            ids: PointIds::default(),
            mesh: Mesh::new(),
        }
    }

    fn enter(&mut self, stage: Stage) {
        tracing::info!(from = %self.stage, to = %stage, "stage");
        self.stage = stage;
    }

    fn push(&mut self, name: &str, patch: Patch) {
        tracing::debug!(
            patch = name,
            points = patch.point_count(),
            faces = patch.faces.len(),
            next_id = self.ids.peek(),
            "patch ready"
        );
        self.mesh.push(patch);
    }

    /// Logo or cap at one pole; `phi_cap` is signed by hemisphere.
    fn polar(
        &mut self,
        logo: Option<&LogoSettings>,
        has_caps: bool,
        phi_cap: f64,
    ) -> Result<Option<Polar>, MeshError> {
        let with_faces = self.settings.with_faces;
        let caps_height = self.settings.caps_height;
        let north = phi_cap > 0.0;

        if let Some(logo) = logo {
            let patch = logo_patch(
                &logo.heights,
                phi_cap,
                caps_height,
                logo.scale,
                with_faces,
                &mut self.ids,
            )?;
            let boundary = if with_faces {
                let extreme = if north { Extreme::Lowest } else { Extreme::Highest };
                points_at_extreme(&patch.rows, extreme)?
            } else {
                Row::new()
            };
            Ok(Some(Polar { patch, boundary }))
        } else if has_caps {
            let patch = cap_patch(caps_height, phi_cap, with_faces, &mut self.ids)?;
            let ring = if north { patch.last_row() } else { patch.first_row() };
            let boundary = ring.cloned().ok_or(MeshError::EmptyBoundary)?;
            Ok(Some(Polar { patch, boundary }))
        } else {
            Ok(None)
        }
    }
}

/// Build the complete mesh for a height field.
///
/// # Errors
///
/// Fails on invalid settings, empty rasters, a cap angle that leaves no map
/// rows, or a polar patch without a boundary to stitch along.
pub fn build_mesh(
    heights: &HeightField,
    settings: &MeshSettings,
    logos: &Logos,
) -> Result<Mesh, MeshError> {
    let _span = tracing::info_span!("assemble", projection = %settings.projection).entered();
    settings.validate()?;
    heights.ensure_not_empty()?;

    let no_logos = Logos::default();
    let logos = if settings.projection.is_azimuthal()
        && (logos.north.is_some() || logos.south.is_some())
    {
        tracing::warn!(
            projection = %settings.projection,
            "projection has no polar rim; logos ignored"
        );
        &no_logos
    } else {
        logos
    };

    let mut asm = Assembler::new(settings);

    asm.enter(Stage::ExtractHeights);
    let radii = RadiusMap::new(heights, settings.scale, settings.flat_epsilon);
    if radii.is_flat() {
        tracing::warn!("height range is degenerate; building a unit sphere without overlays");
    }
    let sampling = RasterSampling::new(
        settings.projection,
        heights.width(),
        heights.height(),
        settings.points,
    );
    let top_latitude = sampling.projection().top_latitude();
    if settings.projection.is_azimuthal() && matches!(settings.caps, Caps::Angle(_)) {
        tracing::warn!(
            projection = %settings.projection,
            "projection cannot be capped; caps ignored"
        );
    }
    let mut caps = settings.resolved_caps();
    let phi_cap = match caps {
        Caps::Angle(deg) => FRAC_PI_2 - deg.to_radians(),
        Caps::Auto | Caps::None => top_latitude,
    };
    if caps == Caps::Auto && phi_cap >= FRAC_PI_2 - 1e-9 {
        tracing::debug!("map reaches the poles; no caps needed");
        caps = Caps::None;
    }
    let has_caps = caps != Caps::None;
    if has_caps && phi_cap > top_latitude {
        tracing::warn!(
            cap_deg = phi_cap.to_degrees(),
            map_deg = top_latitude.to_degrees(),
            "gap between caps and map; consider a different caps angle"
        );
    }
    let sampling = sampling.with_phi_limit(phi_cap);
    let overlays = if settings.projection.is_azimuthal() {
        Overlays::none()
    } else {
        let overlays = Overlays::new(
            settings.meridians.clone(),
            settings.meridians_height,
            settings.caps_height,
            phi_cap,
            settings.equator_width,
            settings.equator_height,
        );
        if radii.is_flat() { overlays.disabled() } else { overlays }
    };
    tracing::debug!(
        caps = ?caps,
        phi_cap_deg = phi_cap.to_degrees(),
        step_y = sampling.sampler().step_y(),
        overlays = overlays.is_enabled(),
        "heights extracted"
    );

    asm.enter(Stage::BuildNorth);
    let north = asm.polar(logos.north.as_ref(), has_caps, phi_cap)?;
    let north_boundary = match north {
        Some(Polar { patch, boundary }) => {
            asm.push("north", patch);
            Some(boundary)
        }
        None => None,
    };

    asm.enter(Stage::BuildMapBody);
    let map = map_patch(
        heights,
        &sampling,
        &radii,
        &overlays,
        settings.with_faces,
        &mut asm.ids,
    )?;
    let (Some(map_first), Some(map_last)) = (map.first_row(), map.last_row()) else {
        return Err(MeshError::EmptyMap {
            cap_deg: phi_cap.to_degrees(),
        });
    };
    let (map_first, map_last) = (map_first.clone(), map_last.clone());

    asm.enter(Stage::StitchNorth);
    if let Some(boundary) = north_boundary.filter(|_| settings.with_faces) {
        if boundary.is_empty() {
            return Err(MeshError::EmptyBoundary);
        }
        let faces = stitch_rows(&boundary, &map_first)?;
        asm.push("north stitch", Patch::stitch(faces));
    }
    asm.push("map", map);

    asm.enter(Stage::BuildSouth);
    let south = asm.polar(logos.south.as_ref(), has_caps, -phi_cap)?;

    asm.enter(Stage::StitchSouth);
    if let Some(Polar { patch, boundary }) = south {
        if settings.with_faces {
            if boundary.is_empty() {
                return Err(MeshError::EmptyBoundary);
            }
            let faces = stitch_rows(&map_last, &boundary)?;
            asm.push("south stitch", Patch::stitch(faces));
        }
        asm.push("south", patch);
    }

    if settings.thickness > 0.0 {
        asm.enter(Stage::BuildInnerShell);
        let shell = shell_patch(settings.thickness, settings.with_faces, &mut asm.ids)?;
        asm.push("shell", shell);
    }

    asm.enter(Stage::Done);
    let mesh = asm.mesh;
    if settings.with_faces && tracing::enabled!(tracing::Level::DEBUG) {
        let report = winding::inspect(&mesh);
        tracing::debug!(
            open_edges = report.open_edges,
            overshared_edges = report.overshared_edges,
            outward_faces = report.outward_faces,
            "mesh closure"
        );
    }
    tracing::info!(
        vertices = mesh.vertex_count(),
        faces = mesh.face_count(),
        patches = mesh.patches().len(),
        "mesh assembled"
    );
    Ok(mesh)
}

/// A unit sphere painted with the colors of `colors`, without caps or overlays.
pub fn paint_mesh(
    colors: &ColorField,
    projection: ProjectionKind,
    points: usize,
) -> Result<Mesh, MeshError> {
    let _span = tracing::info_span!("paint", projection = %projection).entered();
    let sampling = RasterSampling::new(projection, colors.width(), colors.height(), points);
    let mut ids = PointIds::default();
    let mut mesh = Mesh::new();
    mesh.push(paint_patch(colors, &sampling, &mut ids)?);
    tracing::info!(
        vertices = mesh.vertex_count(),
        faces = mesh.face_count(),
        "painted mesh assembled"
    );
    Ok(mesh)
}

/// A single-patch mesh from rows recovered elsewhere (e.g. a point cloud).
pub fn mesh_from_rows(rows: Vec<Row>) -> Result<Mesh, MeshError> {
    let faces = faces_for_rows(&rows)?;
    let mut mesh = Mesh::new();
    mesh.push(Patch::new(rows, faces));
    Ok(mesh)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rustc_hash::FxHashSet;

    use crate::boundary::{Extreme, points_at_extreme};
    use crate::field::Grid;
    use crate::mesh::{Face, PointId};
    use crate::winding::{edge_counts, inspect};

    const EPSILON: f64 = 1e-9;

    fn bumpy(nx: usize, ny: usize) -> HeightField {
        Grid::from_fn(nx, ny, |i, j| ((i * 7 + j * 13) % 29) as f64)
    }

    fn settings(projection: ProjectionKind) -> MeshSettings {
        MeshSettings {
            projection,
            points: 2_000,
            ..MeshSettings::default()
        }
    }

    fn assert_ids_dense(mesh: &Mesh) {
        let ids: Vec<u64> = mesh.points().map(|p| p.id).collect();
        assert_eq!(ids, (0..ids.len() as u64).collect::<Vec<_>>());
        assert_eq!(mesh.vertex_count(), ids.len() as u64);
        let n = mesh.vertex_count();
        assert!(mesh.faces().all(|f| f.ids().iter().all(|&id| id < n)));
    }

    #[test]
    fn test_flat_mercator_without_caps_is_unit_sphere() {
        let heights = Grid::filled(200, 160, 3.0);
        let settings = MeshSettings {
            caps: Caps::None,
            ..settings(ProjectionKind::Mercator)
        };
        let mesh = build_mesh(&heights, &settings, &Logos::default()).unwrap();
        assert_eq!(mesh.patches().len(), 1);
        for p in mesh.points() {
            assert!((p.position.length() - 1.0).abs() < EPSILON);
        }
        assert_ids_dense(&mesh);
    }

    #[test]
    fn test_mercator_with_caps_is_closed_and_outward() {
        let mesh = build_mesh(
            &bumpy(240, 200),
            &settings(ProjectionKind::Mercator),
            &Logos::default(),
        )
        .unwrap();
        // north, stitch, map, stitch, south
        assert_eq!(mesh.patches().len(), 5);
        assert!(mesh.patches()[1].is_stitch());
        assert!(mesh.patches()[3].is_stitch());
        assert_ids_dense(&mesh);
        let report = inspect(&mesh);
        assert!(report.is_closed(), "{report:?}");
        assert!(report.outward_faces * 10 >= report.faces * 9, "{report:?}");
    }

    #[test]
    fn test_explicit_caps_angle_limits_map() {
        let settings = MeshSettings {
            caps: Caps::Angle(30.0),
            ..settings(ProjectionKind::Equirectangular)
        };
        let mesh = build_mesh(&bumpy(240, 120), &settings, &Logos::default()).unwrap();
        let map = &mesh.patches()[2];
        let limit = (60f64).to_radians().sin();
        for p in map.points() {
            assert!(p.unit().z.abs() <= limit + EPSILON);
        }
        assert!(inspect(&mesh).is_closed());
    }

    #[test]
    fn test_equal_area_auto_means_no_caps() {
        let settings = settings(ProjectionKind::Mollweide);
        assert_eq!(settings.resolved_caps(), Caps::None);
        let mesh = build_mesh(&bumpy(360, 162), &settings, &Logos::default()).unwrap();
        assert_eq!(mesh.patches().len(), 1);
        assert_ids_dense(&mesh);
    }

    #[test]
    fn test_shell_adds_inner_patch() {
        let settings = MeshSettings {
            thickness: 0.1,
            ..settings(ProjectionKind::Mercator)
        };
        let mesh = build_mesh(&bumpy(240, 200), &settings, &Logos::default()).unwrap();
        let shell = mesh.patches().last().unwrap();
        assert!(shell.points().all(|p| (p.position.length() - 0.9).abs() < EPSILON));
        assert_ids_dense(&mesh);
        assert!(inspect(&mesh).is_closed());
    }

    #[test]
    fn test_point_cloud_has_no_faces() {
        let settings = MeshSettings {
            with_faces: false,
            thickness: 0.2,
            ..settings(ProjectionKind::Mercator)
        };
        let mesh = build_mesh(&bumpy(120, 100), &settings, &Logos::default()).unwrap();
        assert_eq!(mesh.face_count(), 0);
        assert!(mesh.patches().iter().all(|p| !p.is_stitch()));
        assert_ids_dense(&mesh);
    }

    #[test]
    fn test_logos_replace_caps() {
        let logo = LogoSettings {
            heights: Grid::from_fn(31, 31, |i, j| ((i + j) % 5) as f64),
            scale: 1.0,
        };
        let logos = Logos {
            north: Some(logo.clone()),
            south: Some(logo),
        };
        let mesh = build_mesh(&bumpy(240, 200), &settings(ProjectionKind::Mercator), &logos).unwrap();
        assert_eq!(mesh.patches().len(), 5);
        assert_ids_dense(&mesh);
        let north = &mesh.patches()[0];
        assert!(north.points().all(|p| p.position.z > 0.0));
        let south = &mesh.patches()[4];
        assert!(south.points().all(|p| p.position.z < 0.0));
    }

    #[test]
    fn test_logo_stitches_join_boundary_and_map_only() {
        let logo = LogoSettings {
            heights: Grid::from_fn(31, 31, |i, j| ((i + j) % 5) as f64),
            scale: 1.0,
        };
        let logos = Logos {
            north: Some(logo.clone()),
            south: Some(logo),
        };
        let mesh = build_mesh(&bumpy(240, 200), &settings(ProjectionKind::Mercator), &logos).unwrap();
        let patches = mesh.patches();
        let map = &patches[2];
        let map_first = map.first_row().unwrap();
        let map_last = map.last_row().unwrap();

        let north_rim = points_at_extreme(&patches[0].rows, Extreme::Lowest).unwrap();
        let south_rim = points_at_extreme(&patches[4].rows, Extreme::Highest).unwrap();
        let allowed = |rim: &Row, ring: &Row| -> FxHashSet<PointId> {
            rim.iter().chain(ring.iter()).map(|p| p.id).collect()
        };
        let north_ids = allowed(&north_rim, map_first);
        let south_ids = allowed(&south_rim, map_last);

        assert!(patches[1].is_stitch() && !patches[1].faces.is_empty());
        assert!(patches[3].is_stitch() && !patches[3].faces.is_empty());
        for face in &patches[1].faces {
            assert!(face.ids().iter().all(|id| north_ids.contains(id)), "{face:?}");
        }
        for face in &patches[3].faces {
            assert!(face.ids().iter().all(|id| south_ids.contains(id)), "{face:?}");
        }

        let joined: Vec<Face> = patches[1..4]
            .iter()
            .flat_map(|p| p.faces.iter().copied())
            .collect();
        assert!(edge_counts(&joined).values().all(|&n| n <= 2));
    }

    #[test]
    fn test_half_sphere_ignores_caps_and_logos() {
        let heights = bumpy(200, 200);
        let plain = MeshSettings {
            caps: Caps::None,
            ..settings(ProjectionKind::HalfSphere)
        };
        let capped = MeshSettings {
            caps: Caps::Angle(20.0),
            ..settings(ProjectionKind::HalfSphere)
        };
        assert_eq!(capped.resolved_caps(), Caps::None);

        let logo = LogoSettings {
            heights: Grid::from_fn(15, 15, |i, j| (i * j) as f64),
            scale: 1.0,
        };
        let logos = Logos {
            north: Some(logo.clone()),
            south: Some(logo),
        };
        let expected = build_mesh(&heights, &plain, &Logos::default()).unwrap();
        let mesh = build_mesh(&heights, &capped, &logos).unwrap();
        assert_eq!(mesh.patches().len(), 1);
        assert_eq!(mesh, expected);
    }

    #[test]
    fn test_invalid_settings_fail_fast() {
        let heights = bumpy(20, 10);
        let cases = [
            MeshSettings {
                caps: Caps::Angle(90.0),
                ..MeshSettings::default()
            },
            MeshSettings {
                thickness: 1.0,
                ..MeshSettings::default()
            },
            MeshSettings {
                scale: f64::NAN,
                ..MeshSettings::default()
            },
            MeshSettings {
                meridians: vec![Meridian::from_degrees(0.0, -1.0)],
                ..MeshSettings::default()
            },
        ];
        for settings in cases {
            assert!(build_mesh(&heights, &settings, &Logos::default()).is_err());
        }
        let empty = Grid::filled(0, 0, 0.0);
        assert!(matches!(
            build_mesh(&empty, &MeshSettings::default(), &Logos::default()),
            Err(MeshError::EmptyHeightField { .. })
        ));
    }

    #[test]
    fn test_repeated_builds_are_identical() {
        let heights = bumpy(180, 150);
        let settings = settings(ProjectionKind::CentralCylindrical);
        let a = build_mesh(&heights, &settings, &Logos::default()).unwrap();
        let b = build_mesh(&heights, &settings, &Logos::default()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_paint_mesh_single_patch() {
        let colors = Grid::filled(72, 36, [10, 20, 30, 255]);
        let mesh = paint_mesh(&colors, ProjectionKind::Equirectangular, 0).unwrap();
        assert_eq!(mesh.patches().len(), 1);
        assert!(mesh.has_colors());
    }

    #[test]
    fn test_stage_names() {
        assert_eq!(Stage::default(), Stage::Idle);
        assert_eq!(Stage::BuildInnerShell.to_string(), "build-inner-shell");
    }
}
