//! The globe entity, its destination markers and arc lines.
//!
//! All interaction state lives in [`GlobeState`]; systems here only mirror it
//! into the scene each frame.

use arcglobe::{DestinationId, GlobeController, Rgb};
use bevy::asset::RenderAssetUsages;
use bevy::mesh::{Indices, PrimitiveTopology};
use bevy::prelude::*;
use glam::DVec3;

/// Marker sphere radius in globe units.
pub const MARKER_RADIUS: f32 = 0.02;

const GLOBE_SEGMENTS: u32 = 96;
const GLOBE_RINGS: u32 = 48;

/// Plugin for the globe scene.
pub struct GlobePlugin {
    /// Globe texture asset path.
    pub texture: String,
}

impl Plugin for GlobePlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(GlobeTexture(self.texture.clone()))
            .configure_sets(
                Update,
                (GlobeSet::Input, GlobeSet::Tick, GlobeSet::Sync).chain(),
            )
            .add_systems(Startup, spawn_globe)
            .add_systems(Update, (tick_globe.in_set(GlobeSet::Tick), apply_globe_texture))
            .add_systems(
                Update,
                (sync_globe_rotation, sync_markers, sync_arc_lines).in_set(GlobeSet::Sync),
            );
    }
}

/// Ordering of per-frame work: input handlers, then the controller tick,
/// then mirroring into the scene.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum GlobeSet {
    Input,
    Tick,
    Sync,
}

/// The interaction controller.
#[derive(Resource)]
pub struct GlobeState(pub GlobeController);

#[derive(Resource)]
struct GlobeTexture(String);

/// Globe texture still loading, attached to the material once it is ready.
#[derive(Resource)]
struct PendingTexture {
    image: Handle<Image>,
    material: Handle<StandardMaterial>,
}

/// Globe colour until the texture arrives, or if it never does.
const UNTEXTURED_COLOR: Color = Color::srgb(0.05, 0.12, 0.25);

/// Marker for the rotating globe entity.
#[derive(Component)]
pub struct Globe;

/// A destination's marker sphere.
#[derive(Component)]
pub struct DestinationMarker(pub DestinationId);

/// A destination's arc line and how many of its points are uploaded.
#[derive(Component)]
struct ArcLine {
    id: DestinationId,
    mesh: Handle<Mesh>,
    shown: usize,
}

fn srgb(color: Rgb) -> Color {
    Color::srgb_u8(color.r(), color.g(), color.b())
}

fn to_vec3(p: DVec3) -> Vec3 {
    p.as_vec3()
}

/// Spawn the globe with one marker and one (hidden) arc line per destination.
#[allow(clippy::needless_pass_by_value, clippy::cast_possible_truncation)]
fn spawn_globe(
    mut commands: Commands,
    state: Res<GlobeState>,
    texture: Res<GlobeTexture>,
    asset_server: Res<AssetServer>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let controller = &state.0;

    // A material pointing at an unloaded image is never drawn, so the texture
    // is attached only once the asset server reports it loaded.
    let globe_material = materials.add(StandardMaterial {
        base_color: UNTEXTURED_COLOR,
        unlit: true,
        ..default()
    });
    commands.insert_resource(PendingTexture {
        image: asset_server.load(texture.0.clone()),
        material: globe_material.clone(),
    });
    let globe_radius = controller.config().radius as f32;

    let globe = commands
        .spawn((
            Globe,
            Mesh3d(meshes.add(globe_mesh(globe_radius, GLOBE_SEGMENTS, GLOBE_RINGS))),
            MeshMaterial3d(globe_material),
            Transform::from_rotation(controller.orientation().as_quat()),
        ))
        .id();

    let marker_mesh = meshes.add(Sphere::new(MARKER_RADIUS));
    for (id, destination) in controller.registry().iter() {
        let color = srgb(destination.color);

        commands.spawn((
            DestinationMarker(id),
            Mesh3d(marker_mesh.clone()),
            MeshMaterial3d(materials.add(StandardMaterial {
                base_color: color,
                unlit: true,
                ..default()
            })),
            Transform::from_translation(to_vec3(destination.marker)),
            ChildOf(globe),
        ));

        let line_mesh = meshes.add(line_mesh(&[]));
        commands.spawn((
            ArcLine {
                id,
                mesh: line_mesh.clone(),
                shown: 0,
            },
            Mesh3d(line_mesh),
            MeshMaterial3d(materials.add(StandardMaterial {
                base_color: color,
                unlit: true,
                ..default()
            })),
            Transform::IDENTITY,
            Visibility::Hidden,
            ChildOf(globe),
        ));
    }

    tracing::info!(destinations = controller.registry().len(), "globe spawned");
}

/// Attach the globe texture once loaded; keep the plain colour if it fails.
#[allow(clippy::needless_pass_by_value)]
fn apply_globe_texture(
    mut commands: Commands,
    pending: Option<Res<PendingTexture>>,
    asset_server: Res<AssetServer>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let Some(pending) = pending else {
        return;
    };
    let state = asset_server.load_state(&pending.image);
    if state.is_loaded() {
        if let Some(material) = materials.get_mut(&pending.material) {
            material.base_color = Color::WHITE;
            material.base_color_texture = Some(pending.image.clone());
        }
        tracing::info!("globe texture loaded");
    } else if state.is_failed() {
        tracing::warn!("globe texture failed to load, rendering untextured");
    } else {
        return;
    }
    commands.remove_resource::<PendingTexture>();
}

/// Advance focus convergence and arc reveal by one frame.
fn tick_globe(mut state: ResMut<GlobeState>) {
    state.0.tick();
}

#[allow(clippy::needless_pass_by_value)]
fn sync_globe_rotation(state: Res<GlobeState>, mut globe: Single<&mut Transform, With<Globe>>) {
    globe.rotation = state.0.orientation().as_quat();
}

#[allow(clippy::needless_pass_by_value, clippy::cast_possible_truncation)]
fn sync_markers(
    state: Res<GlobeState>,
    mut markers: Query<(&DestinationMarker, &mut Transform)>,
) {
    for (marker, mut transform) in &mut markers {
        transform.scale = Vec3::splat(state.0.marker_scale(marker.0) as f32);
    }
}

/// Upload the revealed prefix of each arc when it changes.
#[allow(clippy::needless_pass_by_value)]
fn sync_arc_lines(
    state: Res<GlobeState>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut lines: Query<(&mut ArcLine, &mut Visibility)>,
) {
    for (mut line, mut visibility) in &mut lines {
        let points = state.0.visible_points(line.id);
        if points.len() == line.shown {
            continue;
        }
        line.shown = points.len();

        // A strip needs two points before anything can be drawn.
        if points.len() < 2 {
            *visibility = Visibility::Hidden;
            continue;
        }
        if let Some(mesh) = meshes.get_mut(&line.mesh) {
            let positions: Vec<[f32; 3]> =
                points.iter().map(|p| to_vec3(*p).to_array()).collect();
            mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, positions);
        }
        *visibility = Visibility::Inherited;
    }
}

/// A line strip through `points`.
fn line_mesh(points: &[Vec3]) -> Mesh {
    let positions: Vec<[f32; 3]> = points.iter().map(|p| p.to_array()).collect();
    let mut mesh = Mesh::new(PrimitiveTopology::LineStrip, RenderAssetUsages::default());
    mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, positions);
    mesh
}

/// Latitude/longitude sphere whose vertices sit exactly where
/// [`arcglobe::project`] puts them.
///
/// `u` runs westward from the `+X` meridian and `v` from the north pole, so an
/// equirectangular texture lines up with projected destinations.
#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
fn globe_mesh(radius: f32, segments: u32, rings: u32) -> Mesh {
    let columns = segments + 1;
    let mut positions = Vec::with_capacity(((rings + 1) * columns) as usize);
    let mut normals = Vec::with_capacity(positions.capacity());
    let mut uvs = Vec::with_capacity(positions.capacity());

    for ring in 0..=rings {
        let v = ring as f32 / rings as f32;
        let lat = 90.0 - 180.0 * f64::from(v);
        for segment in 0..=segments {
            let u = segment as f32 / segments as f32;
            let lon = 360.0 * f64::from(u);
            let normal = arcglobe::project(lat, lon, 1.0).as_vec3();
            positions.push((normal * radius).to_array());
            normals.push(normal.to_array());
            uvs.push([1.0 - u, v]);
        }
    }

    let mut indices = Vec::with_capacity((rings * segments * 6) as usize);
    for ring in 0..rings {
        for segment in 0..segments {
            let a = ring * columns + segment;
            let b = a + columns;
            // Counter-clockwise seen from outside.
            indices.extend_from_slice(&[a, a + 1, b, a + 1, b + 1, b]);
        }
    }

    let mut mesh = Mesh::new(PrimitiveTopology::TriangleList, RenderAssetUsages::default());
    mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, positions);
    mesh.insert_attribute(Mesh::ATTRIBUTE_NORMAL, normals);
    mesh.insert_attribute(Mesh::ATTRIBUTE_UV_0, uvs);
    mesh.insert_indices(Indices::U32(indices));
    mesh
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::mesh::VertexAttributeValues;

    #[test]
    fn test_globe_mesh_vertices_on_sphere() {
        let mesh = globe_mesh(1.0, 8, 4);
        let Some(VertexAttributeValues::Float32x3(positions)) =
            mesh.attribute(Mesh::ATTRIBUTE_POSITION)
        else {
            panic!("missing positions");
        };
        assert_eq!(positions.len(), 9 * 5);
        for p in positions {
            let length = Vec3::from_array(*p).length();
            assert!((length - 1.0).abs() < 1e-5);
        }
        assert_eq!(mesh.indices().map(Indices::len), Some(8 * 4 * 6));
    }

    #[test]
    fn test_globe_mesh_faces_outward() {
        let mesh = globe_mesh(1.0, 16, 8);
        let Some(VertexAttributeValues::Float32x3(positions)) =
            mesh.attribute(Mesh::ATTRIBUTE_POSITION)
        else {
            panic!("missing positions");
        };
        let Some(Indices::U32(indices)) = mesh.indices() else {
            panic!("missing indices");
        };
        for tri in indices.chunks(3) {
            let [a, b, c] =
                [tri[0], tri[1], tri[2]].map(|i| Vec3::from_array(positions[i as usize]));
            let normal = (b - a).cross(c - a);
            // Pole triangles collapse to zero area.
            if normal.length() < 1e-9 {
                continue;
            }
            assert!(normal.dot(a + b + c) > 0.0);
        }
    }

    #[test]
    fn test_line_mesh_positions() {
        let mesh = line_mesh(&[Vec3::X, Vec3::Y]);
        assert_eq!(mesh.count_vertices(), 2);
        assert_eq!(mesh.primitive_topology(), PrimitiveTopology::LineStrip);
    }

    #[test]
    fn test_srgb_conversion() {
        let color = srgb(Rgb(0xC1_272D)).to_srgba();
        assert!((color.red - f32::from(0xC1_u8) / 255.0).abs() < 1e-6);
        assert!((color.blue - f32::from(0x2D_u8) / 255.0).abs() < 1e-6);
    }
}
