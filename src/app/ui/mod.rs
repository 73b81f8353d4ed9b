mod cards;
mod pagination;
mod panels;
mod search;
