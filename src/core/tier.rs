use crate::domain::model::Category;

pub fn rank(category: Category) -> u8 {
    match category {
        Category::Normal => 0,
        Category::Gold => 1,
        Category::Platinum => 2,
        Category::Black => 3,
    }
}
