use glam::Vec3;

use super::*;

const EPSILON: f32 = 1e-5;

/// Helper: compute cross product of two 3D vectors
fn cross(a: [f32; 3], b: [f32; 3]) -> [f32; 3] {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

/// Helper: compute dot product of two 3D vectors
fn dot(a: [f32; 3], b: [f32; 3]) -> f32 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

/// Helper: subtract two vectors (a - b)
fn sub(a: [f32; 3], b: [f32; 3]) -> [f32; 3] {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

fn magnitude(v: [f32; 3]) -> f32 {
    dot(v, v).sqrt()
}

/// Verify all triangles face away from `center`
/// Returns (passed, failed, skipped, total) counts
/// Skipped triangles are zero-area
fn verify_outward_normals(mesh: &Mesh, center: [f32; 3]) -> (usize, usize, usize, usize) {
    let mut passed = 0;
    let mut failed = 0;
    let mut skipped = 0;

    for [i0, i1, i2] in mesh.triangles() {
        let v0 = mesh.vertices[i0 as usize];
        let v1 = mesh.vertices[i1 as usize];
        let v2 = mesh.vertices[i2 as usize];

        let normal = cross(sub(v1, v0), sub(v2, v0));
        if magnitude(normal) < 1e-9 {
            skipped += 1;
            continue;
        }

        let centroid = [
            (v0[0] + v1[0] + v2[0]) / 3.0,
            (v0[1] + v1[1] + v2[1]) / 3.0,
            (v0[2] + v1[2] + v2[2]) / 3.0,
        ];

        if dot(normal, sub(centroid, center)) > 0.0 {
            passed += 1;
        } else {
            failed += 1;
        }
    }

    (passed, failed, skipped, passed + failed + skipped)
}

fn sphere(stacks: u32, sectors: u32) -> Mesh {
    generate(&SphereSpec::centered(1.0, stacks, sectors)).expect("valid sphere spec")
}

// ============================================================================
// Counts and structure
// ============================================================================

#[test]
fn test_sphere_counts() {
    let mesh = sphere(8, 16);
    let expected_verts = 9 * 17; // (stacks + 1) × (sectors + 1)
    let expected_indices = 6 * 16 * 7; // 6 × sectors × (stacks - 1)
    assert_eq!(mesh.vertices.len(), expected_verts);
    assert_eq!(mesh.texcoords.len(), expected_verts);
    assert_eq!(mesh.indices.len(), expected_indices);
}

#[test]
fn test_counts_match_spec_predictions() {
    for (stacks, sectors) in [(2, 3), (3, 4), (7, 5), (18, 36), (64, 128)] {
        let spec = SphereSpec::centered(2.0, stacks, sectors);
        let mesh = generate(&spec).unwrap();
        assert_eq!(mesh.vertex_count(), spec.vertex_count(), "{stacks}x{sectors}");
        assert_eq!(mesh.indices.len(), spec.index_count(), "{stacks}x{sectors}");
        assert_eq!(mesh.triangle_count(), spec.triangle_count(), "{stacks}x{sectors}");
    }
}

#[test]
fn test_capacity_is_exact() {
    let spec = SphereSpec::centered(1.0, 12, 24);
    let mesh = generate(&spec).unwrap();
    assert_eq!(mesh.vertices.capacity(), spec.vertex_count());
    assert_eq!(mesh.texcoords.capacity(), spec.vertex_count());
    assert_eq!(mesh.indices.capacity(), spec.index_count());
}

#[test]
fn test_invariants_hold() {
    for (stacks, sectors) in [(2, 3), (2, 4), (5, 3), (9, 17), (32, 64)] {
        let mesh = sphere(stacks, sectors);
        assert_eq!(mesh.check_invariants(), Ok(()), "{stacks}x{sectors}");
        assert_eq!(mesh.indices.len() % 3, 0);
        assert!(
            mesh.indices.iter().all(|&i| (i as usize) < mesh.vertices.len()),
            "{stacks}x{sectors}: index out of range"
        );
    }
}

#[test]
fn test_no_repeated_index_in_triangle() {
    let mesh = sphere(6, 7);
    for (n, [a, b, c]) in mesh.triangles().enumerate() {
        assert!(a != b && b != c && a != c, "triangle {n} repeats a vertex: {a} {b} {c}");
    }
}

#[test]
fn test_minimal_sphere() {
    // stacks = 2, sectors = 4: two pole rows and one equator row of 5 vertices each
    let mesh = sphere(2, 4);
    assert_eq!(mesh.vertex_count(), 15);
    assert_eq!(mesh.indices.len(), 24);

    for column in 0..5 {
        let top = mesh.position(column);
        let equator = mesh.position(5 + column);
        let bottom = mesh.position(10 + column);

        assert_eq!(top, Vec3::Z, "top pole copy {column}");
        assert_eq!(bottom, -Vec3::Z, "bottom pole copy {column}");
        assert!(equator.z.abs() < EPSILON, "equator vertex {column} off the XY plane");
        assert!((equator.length() - 1.0).abs() < EPSILON);
    }

    let (passed, failed, skipped, total) = verify_outward_normals(&mesh, [0.0; 3]);
    assert_eq!(total, 8);
    assert_eq!(skipped, 0, "minimal sphere should have no zero-area triangles");
    assert_eq!(failed, 0);
    assert_eq!(passed, 8);
}

// ============================================================================
// Geometry
// ============================================================================

#[test]
fn test_vertices_on_sphere_surface() {
    let center = Vec3::new(3.0, -2.0, 0.5);
    let radius = 4.5;
    let mesh = generate(&SphereSpec::new(center, radius, 13, 29)).unwrap();

    for (i, _) in mesh.vertices.iter().enumerate() {
        let distance = mesh.position(i as u32).distance(center);
        assert!(
            (distance - radius).abs() < radius * EPSILON * 4.0,
            "vertex {i} is {distance} from center, expected {radius}"
        );
    }
}

#[test]
fn test_poles_present() {
    let center = Vec3::new(1.0, 2.0, 3.0);
    let mesh = generate(&SphereSpec::new(center, 2.0, 5, 6)).unwrap();
    let top = center + Vec3::new(0.0, 0.0, 2.0);
    let bottom = center - Vec3::new(0.0, 0.0, 2.0);

    let tops = (0..mesh.vertex_count() as u32)
        .filter(|&i| mesh.position(i) == top)
        .count();
    let bottoms = (0..mesh.vertex_count() as u32)
        .filter(|&i| mesh.position(i) == bottom)
        .count();

    // One copy per sector boundary
    assert_eq!(tops, 7);
    assert_eq!(bottoms, 7);
}

#[test]
fn test_pole_copies_have_distinct_u() {
    let mesh = sphere(4, 8);
    let columns = 9;
    let last_row = 4 * columns;

    for row_start in [0, last_row] {
        let us: Vec<f32> = (row_start..row_start + columns)
            .map(|i| mesh.texcoords[i][0])
            .collect();
        for pair in us.windows(2) {
            assert!(pair[0] < pair[1], "pole copies must carry increasing u: {us:?}");
        }
    }
}

#[test]
fn test_seam_closed_by_position() {
    let stacks = 9;
    let sectors = 13;
    let mesh = sphere(stacks, sectors);
    let columns = sectors + 1;

    // Every row: the closing column sits exactly on column 0
    for row in 0..=stacks {
        let first = mesh.vertices[(row * columns) as usize];
        let closing = mesh.vertices[(row * columns + sectors) as usize];
        assert_eq!(first, closing, "row {row} seam is open");
    }

    // Every band: the right edge of the last sector is the left edge of sector 0
    let last = sectors - 1;
    assert_eq!(next_sector(last, sectors), 0);
    for band in 0..stacks {
        let right_edge = [
            mesh.position(band * columns + last + 1),
            mesh.position((band + 1) * columns + last + 1),
        ];
        let wrapped = next_sector(last, sectors);
        let left_edge = [
            mesh.position(band * columns + wrapped),
            mesh.position((band + 1) * columns + wrapped),
        ];
        assert_eq!(right_edge, left_edge, "band {band} seam is open");
    }
}

#[test]
fn test_seam_triangles_use_closing_column() {
    let sectors = 6;
    let mesh = sphere(3, sectors);
    let columns = sectors + 1;
    let closing: Vec<u32> = (0..=3).map(|row| row * columns + sectors).collect();

    let seam_triangles = mesh
        .triangles()
        .filter(|tri| tri.iter().any(|i| closing.contains(i)))
        .count();

    // Two pole fans plus one quad band of two triangles
    assert_eq!(seam_triangles, 4);
}

#[test]
fn test_winding_sphere() {
    let mesh = sphere(16, 32);
    let (passed, failed, skipped, total) = verify_outward_normals(&mesh, [0.0, 0.0, 0.0]);

    assert_eq!(
        failed, 0,
        "Sphere winding: {}/{} triangles have incorrect winding (normals point inward)",
        failed, total
    );
    assert_eq!(skipped, 0, "Sphere should have no zero-area triangles");
    assert_eq!(passed, 2 * 32 * 15);
}

#[test]
fn test_winding_offset_center() {
    let center = Vec3::new(-10.0, 4.0, 7.0);
    let mesh = generate(&SphereSpec::new(center, 0.5, 7, 11)).unwrap();
    let (_passed, failed, skipped, _total) = verify_outward_normals(&mesh, center.to_array());

    assert_eq!(failed, 0, "offset sphere has inward-facing triangles");
    assert_eq!(skipped, 0);
}

#[test]
fn test_wrap_sector() {
    assert_eq!(wrap_sector(0, 5), 0);
    assert_eq!(wrap_sector(4, 5), 4);
    assert_eq!(wrap_sector(5, 5), 0);
    assert_eq!(next_sector(3, 5), 4);
    assert_eq!(next_sector(4, 5), 0);
}

// ============================================================================
// Texture coordinates
// ============================================================================

#[test]
fn test_texcoords_in_unit_square() {
    let mesh = sphere(10, 20);
    for (i, [u, v]) in mesh.texcoords.iter().enumerate() {
        assert!((0.0..=1.0).contains(u), "vertex {i} u = {u}");
        assert!((0.0..=1.0).contains(v), "vertex {i} v = {v}");
    }
}

#[test]
fn test_texcoord_rows() {
    let stacks = 6;
    let sectors = 10;
    let mesh = sphere(stacks, sectors);
    let columns = (sectors + 1) as usize;

    for (row, texcoords) in mesh.texcoords.chunks_exact(columns).enumerate() {
        let expected_v = row as f32 / stacks as f32;
        for pair in texcoords.windows(2) {
            assert!(pair[0][0] < pair[1][0], "row {row}: u not increasing");
        }
        assert!(texcoords.iter().all(|t| t[1] == expected_v), "row {row}: v not constant");
        assert_eq!(texcoords[0][0], 0.0);
        assert_eq!(texcoords[columns - 1][0], 1.0);
    }

    assert_eq!(mesh.texcoords[0][1], 0.0, "top pole should be v = 0");
    assert_eq!(mesh.texcoords[mesh.vertex_count() - 1][1], 1.0, "bottom pole should be v = 1");
}

#[test]
fn test_u_follows_longitude() {
    let mesh = sphere(4, 4);
    let columns = 5;
    // Equator ring: u = 0 at +X, u = 0.25 at +Y
    let plus_x = mesh.position(2 * columns);
    let plus_y = mesh.position(2 * columns + 1);
    assert!((plus_x - Vec3::X).length() < EPSILON, "{plus_x}");
    assert!((plus_y - Vec3::Y).length() < EPSILON, "{plus_y}");
    assert_eq!(mesh.texcoords[(2 * columns + 1) as usize], [0.25, 0.5]);
}

// ============================================================================
// Errors and determinism
// ============================================================================

#[test]
fn test_insufficient_resolution() {
    for (stacks, sectors) in [(1, 5), (2, 2), (0, 0), (0, 8), (8, 0)] {
        let result = generate(&SphereSpec::centered(1.0, stacks, sectors));
        assert_eq!(
            result,
            Err(GenerationError::InsufficientResolution {
                stack_count: stacks,
                sector_count: sectors
            })
        );
    }
}

#[test]
fn test_out_of_contract_inputs() {
    assert_eq!(
        generate(&SphereSpec::centered(0.0, 4, 4)),
        Err(GenerationError::InvalidRadius(0.0))
    );
    assert_eq!(
        generate(&SphereSpec::centered(-1.0, 4, 4)),
        Err(GenerationError::InvalidRadius(-1.0))
    );
    assert!(matches!(
        generate(&SphereSpec::centered(f32::NAN, 4, 4)),
        Err(GenerationError::InvalidRadius(_))
    ));
    assert!(matches!(
        generate(&SphereSpec::new(Vec3::new(0.0, f32::INFINITY, 0.0), 1.0, 4, 4)),
        Err(GenerationError::InvalidCenter(_))
    ));
    assert_eq!(
        generate(&SphereSpec::centered(1.0, MAX_STACKS + 1, 4)),
        Err(GenerationError::ResolutionTooHigh {
            stack_count: MAX_STACKS + 1,
            sector_count: 4
        })
    );
}

#[test]
fn test_resolution_checked_before_radius() {
    let result = generate(&SphereSpec::centered(-1.0, 1, 1));
    assert!(matches!(
        result,
        Err(GenerationError::InsufficientResolution { .. })
    ));
}

#[test]
fn test_error_messages() {
    let err = SphereSpec::centered(1.0, 1, 5).validate().unwrap_err();
    assert_eq!(
        err.to_string(),
        "sphere needs at least 2 stacks and 3 sectors, got 1 stacks and 5 sectors"
    );
}

#[test]
fn test_idempotent() {
    let spec = SphereSpec::new(Vec3::new(0.1, 0.2, 0.3), 6.371, 24, 48);
    let a = generate(&spec).unwrap();
    let b = generate(&spec).unwrap();

    let bits = |mesh: &Mesh| -> Vec<u32> {
        mesh.vertices
            .iter()
            .flatten()
            .chain(mesh.texcoords.iter().flatten())
            .map(|f| f.to_bits())
            .collect()
    };
    assert_eq!(bits(&a), bits(&b));
    assert_eq!(a.indices, b.indices);
}

// ============================================================================
// Mesh checks, export
// ============================================================================

#[test]
fn test_check_invariants_reports_defects() {
    let mut mesh = sphere(2, 3);
    mesh.texcoords.pop();
    assert!(matches!(
        mesh.check_invariants(),
        Err(MeshDefect::TexcoordCountMismatch { .. })
    ));

    let mut mesh = sphere(2, 3);
    mesh.indices.pop();
    assert!(matches!(mesh.check_invariants(), Err(MeshDefect::PartialTriangle(_))));

    let mut mesh = sphere(2, 3);
    mesh.indices[4] = 1000;
    assert_eq!(
        mesh.check_invariants(),
        Err(MeshDefect::IndexOutOfRange {
            triangle: 1,
            index: 1000,
            vertex_count: 12
        })
    );

    let mut mesh = sphere(2, 3);
    mesh.indices[2] = mesh.indices[0];
    assert!(matches!(
        mesh.check_invariants(),
        Err(MeshDefect::DegenerateTriangle { triangle: 0, .. })
    ));
}

#[test]
fn test_empty_mesh() {
    let mesh = Mesh::new();
    assert!(mesh.is_empty());
    assert_eq!(mesh.check_invariants(), Ok(()));
}

#[test]
fn test_write_obj() {
    let mesh = sphere(2, 3);
    let mut out = Vec::new();
    write_obj(&mesh, &mut out).unwrap();
    let text = String::from_utf8(out).unwrap();

    assert_eq!(text.lines().filter(|l| l.starts_with("v ")).count(), 12);
    assert_eq!(text.lines().filter(|l| l.starts_with("vt ")).count(), 12);
    assert_eq!(text.lines().filter(|l| l.starts_with("f ")).count(), 6);
    // First triangle is the top fan (0, 4, 5), written 1-based
    assert!(text.contains("\nf 1/1 5/5 6/6\n"), "{text}");
    // Top pole: v = 0 in mesh space is the top of the image, OBJ vt 1
    assert!(text.contains("\nvt 0 1\n"), "{text}");
}

#[test]
fn test_mesh_dump() {
    let mesh = sphere(2, 3);
    let dump = MeshDump(&mesh).to_string();

    assert!(dump.starts_with("vertices (12)\n"));
    assert!(dump.contains("indices (18)\n"));
    assert!(dump.contains("texcoords (12)\n"));
    // Header + 12 vertices + header + 6 triangles + header + 12 texcoords
    assert_eq!(dump.lines().count(), 1 + 12 + 1 + 6 + 1 + 12);
}
