mod make_voronoi;

pub use make_voronoi::MakeVoronoi;
