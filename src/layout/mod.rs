mod legend;
mod plot_area;

pub use legend::{LegendEntry, LegendLayout, LegendOptions, LegendPosition};
pub use plot_area::{
    GridLength, PlotArea, PlotAreaCollection, PlotLength, distribute_lengths, plot_area_clip_id,
};
