use cgmath::Point3;
use voxel_space::{
    serialization::{self, VoxelSpaceData},
    voxels::{grid::VoxelGrid, space::VoxelSpace, voxel::Voxel},
    DecodeError, EncodeError,
};

fn assert_same_content(a: &VoxelSpace, b: &VoxelSpace) {
    assert_eq!(a.grid_size(), b.grid_size());
    assert_eq!(a.voxel_size(), b.voxel_size());
    assert_eq!(a.len(), b.len());
    for (coordinate, grid) in a.grids() {
        let other = b.get_grid(coordinate).expect("grid missing after round trip");
        assert_eq!(*grid.get(), *other.get());
    }
}

#[test]
fn empty_space_round_trips() {
    let space = VoxelSpace::new(16, 0.25);
    let bytes = serialization::serialize_space(&space).unwrap();
    assert_eq!(bytes.len(), 16);

    let loaded = serialization::deserialize_space(&bytes).unwrap();
    assert!(loaded.is_empty());
    assert_eq!(loaded.grid_size(), 16);
    assert_eq!(loaded.voxel_size(), 0.25);
}

#[test]
fn single_grid_round_trips() {
    let mut space = VoxelSpace::new(4, 1.0);
    let grid = space.create_grid(Point3::new(-3, 7, 0));
    grid.get_mut().set(1, 2, 3, Voxel::new(9).with_orientation(4)).unwrap();

    let bytes = serialization::serialize_space(&space).unwrap();
    let loaded = serialization::deserialize_space(&bytes).unwrap();
    assert_same_content(&space, &loaded);
    assert_eq!(
        loaded.get_voxel(Point3::new(-12 + 1, 28 + 2, 3)),
        Some(Voxel::new(9).with_orientation(4))
    );
}

#[test]
fn many_grids_round_trip() {
    let mut rng = fastrand::Rng::with_seed(42);
    let mut space = VoxelSpace::new(6, 0.5);
    for x in -2..2 {
        for z in -1..2 {
            let coordinate = Point3::new(x, 0, z);
            space
                .add_grid(VoxelGrid::random(&mut rng, 0.5, 6, coordinate, 0.4, 10, 6))
                .unwrap();
        }
    }
    space
        .add_grid(VoxelGrid::solid(0.5, 6, Point3::new(0, 1, 0), Voxel::new(1)))
        .unwrap();

    let bytes = serialization::serialize_space(&space).unwrap();
    assert_eq!(bytes.len(), 16 + space.len() * (20 + 6 * 6 * 6 * 4));

    let loaded = serialization::deserialize_space(&bytes).unwrap();
    assert_same_content(&space, &loaded);
    assert_eq!(loaded.to_data().unwrap(), space.to_data().unwrap());
}

#[test]
fn empty_and_full_grids_round_trip() {
    let mut space = VoxelSpace::new(5, 1.0);
    space.create_grid(Point3::new(0, 0, 0));
    space
        .add_grid(VoxelGrid::solid(1.0, 5, Point3::new(1, 0, 0), Voxel::new(2)))
        .unwrap();

    let bytes = serialization::serialize_space(&space).unwrap();
    let loaded = serialization::deserialize_space(&bytes).unwrap();
    assert_same_content(&space, &loaded);
    assert_eq!(loaded.to_data().unwrap(), space.to_data().unwrap());
    assert!(loaded.get_grid(Point3::new(0, 0, 0)).unwrap().get().is_void());
    assert_eq!(loaded.get_grid(Point3::new(1, 0, 0)).unwrap().get().count_existing(), 125);
}

#[cfg(target_pointer_width = "64")]
#[test]
fn oversized_grid_size_fails_to_encode() {
    let space = VoxelSpace::new(1usize << 32, 1.0);
    assert!(matches!(
        serialization::serialize_space(&space),
        Err(EncodeError::GridSizeOverflow(size)) if size == 1usize << 32
    ));
    assert!(space.to_data().is_err());
}

#[test]
fn files_round_trip() {
    let mut space = VoxelSpace::new(3, 1.0);
    space
        .add_grid(VoxelGrid::checkerboard(1.0, 3, Point3::new(1, 1, 1), Voxel::new(5)))
        .unwrap();

    let path = std::env::temp_dir().join(format!(
        "voxel_space_files_round_trip_{}.{}",
        std::process::id(),
        serialization::VOXEL_SPACE_EXTENSION
    ));
    serialization::save(&space, &path).unwrap();
    let loaded = serialization::load(&path).unwrap();
    std::fs::remove_file(&path).unwrap();

    assert_same_content(&space, &loaded);
}

#[test]
fn missing_file_is_an_io_error() {
    assert!(matches!(
        serialization::load("/nonexistent/space.cvx"),
        Err(DecodeError::Io(_))
    ));
}

#[test]
fn corrupt_input_builds_nothing() {
    let data = VoxelSpaceData {
        grid_size: 2,
        voxel_size: 1.0,
        grids: vec![
            (Point3::new(0, 0, 0), vec![Voxel::new(1); 8]),
            (Point3::new(1, 0, 0), vec![Voxel::new(1); 5]),
        ],
    };
    let bytes = serialization::serialize(&data).unwrap();
    match serialization::deserialize_space(&bytes) {
        Err(DecodeError::GridLength { coordinate, expected, actual }) => {
            assert_eq!(coordinate, Point3::new(1, 0, 0));
            assert_eq!((expected, actual), (8, 5));
        }
        other => panic!("unexpected result {:?}", other.map(|s| s.len())),
    }
}
