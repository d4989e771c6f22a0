pub fn default_output_file() -> String {
    String::from("out.barcode")
}

pub fn default_cpx_dimension() -> i64 {
    3
}

pub fn default_min_persistence() -> f64 {
    0.
}

pub fn default_distance_matrix_file() -> String {
    String::from("distance.matrix")
}
