mod includes;
