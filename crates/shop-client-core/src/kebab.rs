//! Row action menus on the admin tables. At most one is open.

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KebabMenus {
    count: usize,
    open: Option<usize>,
}

impl KebabMenus {
    pub fn new(count: usize) -> Self {
        Self { count, open: None }
    }

    /// Open `index` and close any other; toggling the open menu closes it.
    pub fn toggle(&mut self, index: usize) {
        if index >= self.count {
            return;
        }
        self.open = if self.open == Some(index) {
            None
        } else {
            Some(index)
        };
    }

    /// Click anywhere outside a menu.
    pub fn click_outside(&mut self) {
        self.close_all();
    }

    pub fn close_all(&mut self) {
        self.open = None;
    }

    pub fn open_menu(&self) -> Option<usize> {
        self.open
    }

    pub fn is_open(&self, index: usize) -> bool {
        self.open == Some(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opening_one_closes_the_others() {
        let mut menus = KebabMenus::new(3);
        menus.toggle(0);
        menus.toggle(2);
        assert!(!menus.is_open(0));
        assert!(menus.is_open(2));
        assert_eq!(menus.open_menu(), Some(2));
    }

    #[test]
    fn toggle_and_outside_click_close() {
        let mut menus = KebabMenus::new(2);
        menus.toggle(1);
        menus.toggle(1);
        assert_eq!(menus.open_menu(), None);

        menus.toggle(0);
        menus.click_outside();
        assert_eq!(menus.open_menu(), None);
    }

    #[test]
    fn out_of_range_index_is_ignored() {
        let mut menus = KebabMenus::new(1);
        menus.toggle(4);
        assert_eq!(menus.open_menu(), None);
    }
}
